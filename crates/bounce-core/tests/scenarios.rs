//! Integration tests for bounce-core.
//!
//! End-to-end split / remove / materialize sequences through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use bounce_core::{ExportGraph, ExportSchema, GraphError, GraphEvent, Level};

struct Session;

impl ExportSchema for Session {
    type TimeRange = (u64, u64);
    type ChannelConfig = String;
    type Format = String;
    type Filename = String;
}

fn empty_config() -> (ExportGraph<Session>, bounce_core::ConfigPath) {
    let mut graph = ExportGraph::new();
    let path = graph.create_empty_config(
        vec![(0, 48_000)],
        "stereo".to_string(),
        "wav-24".to_string(),
        "{session}-{range}".to_string(),
    );
    (graph, path)
}

#[test]
fn scenario_empty_config_yields_one_job() {
    let (graph, _) = empty_config();
    let jobs = graph.materialize();
    assert_eq!(jobs.len(), 1);
    assert_eq!(*jobs[0].time_range, (0, 48_000));
    assert_eq!(jobs[0].format, "wav-24");
}

#[test]
fn scenario_split_single_parent_format() {
    let (mut graph, path) = empty_config();
    let second = graph.split(path.format, 0.5).unwrap();

    assert_eq!(graph.nodes(Level::Format), &[path.format, second]);
    assert_eq!(graph.parents(second).unwrap(), &[path.channel_config]);

    let jobs = graph.materialize();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].path.format, path.format);
    assert_eq!(jobs[1].path.format, second);
    for job in &jobs {
        assert_eq!(job.path.timespan, path.timespan);
        assert_eq!(job.path.channel_config, path.channel_config);
        assert_eq!(job.path.filename, path.filename);
    }
    graph.check_invariants().unwrap();
}

#[test]
fn scenario_split_format_with_four_parents() {
    let (mut graph, path) = empty_config();
    for _ in 0..3 {
        graph.split(path.channel_config, 0.5).unwrap();
    }
    let parents = graph.parents(path.format).unwrap().to_vec();
    assert_eq!(parents.len(), 4);

    let second = graph.split(path.format, 0.5).unwrap();
    assert_eq!(graph.parents(path.format).unwrap(), &parents[..2]);
    assert_eq!(graph.parents(second).unwrap(), &parents[2..]);
    assert_eq!(graph.materialize().len(), 4);
    graph.check_invariants().unwrap();
}

#[test]
fn scenario_removing_last_child_purges_root() {
    let (mut graph, path) = empty_config();
    let other_root = graph.split(path.timespan, 0.5).unwrap();

    graph.remove(path.channel_config).unwrap();

    assert!(!graph.contains(path.timespan));
    assert_eq!(graph.nodes(Level::Timespan), &[other_root]);
    // The format survives through the copied channel config.
    assert!(graph.contains(path.format));
    assert_eq!(graph.materialize().len(), 1);
    graph.check_invariants().unwrap();
}

#[test]
fn failed_split_leaves_graph_untouched() {
    let (mut graph, path) = empty_config();
    graph.split(path.format, 0.5).unwrap();
    let before = graph.snapshot();

    assert!(matches!(
        graph.split(path.format, f32::INFINITY),
        Err(GraphError::InvalidPosition(_))
    ));
    assert_eq!(graph.snapshot(), before);
}

#[test]
fn stale_handles_fail_safely() {
    let (mut graph, path) = empty_config();
    let second = graph.split(path.filename, 0.5).unwrap();
    graph.remove(second).unwrap();

    assert_eq!(graph.split(second, 0.5), Err(GraphError::NodeNotFound(second)));
    assert_eq!(graph.select(second, true), Err(GraphError::NodeNotFound(second)));
    assert!(graph.children(second).is_err());
    assert_eq!(graph.node_count(), 4);
}

#[test]
fn one_change_notification_per_operation() {
    let (mut graph, path) = empty_config();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    graph.subscribe(move |e| sink.borrow_mut().push(*e));

    let second = graph.split(path.format, 0.5).unwrap();
    graph.remove(second).unwrap();
    graph.select(path.filename, true).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            GraphEvent::Changed,
            GraphEvent::Changed,
            GraphEvent::SelectionChanged {
                node: path.filename,
                selected: true,
            },
        ]
    );
}

#[test]
fn split_timespan_copies_whole_branch() {
    let (mut graph, path) = empty_config();
    // Two formats under the channel config, each with its own filename.
    let flac = graph.split(path.format, 0.5).unwrap();
    let flac_name = graph.split(path.filename, 1.0).unwrap();
    assert_eq!(graph.parents(flac_name).unwrap(), &[flac]);

    let root = graph.split(path.timespan, 0.5).unwrap();
    let cc = graph.children(root).unwrap()[0];
    let formats = graph.children(cc).unwrap().to_vec();
    assert_eq!(formats.len(), 2);
    assert!(!formats.contains(&path.format));
    assert!(!formats.contains(&flac));

    // Distinct grandchildren were copied, not shared.
    let names: Vec<_> = formats
        .iter()
        .map(|&f| graph.children(f).unwrap().to_vec())
        .collect();
    assert_eq!(names[0].len(), 1);
    assert_eq!(names[1].len(), 1);
    assert_ne!(names[0][0], path.filename);
    assert_ne!(names[1][0], flac_name);
    assert_eq!(graph.payload(root).unwrap().as_timespan(), Some(&[(0, 48_000)][..]));
    assert_eq!(graph.materialize().len(), 4);
    graph.check_invariants().unwrap();
}

#[test]
fn ancestry_through_shared_nodes() {
    let (mut graph, path) = empty_config();
    let cc = graph.split(path.channel_config, 0.5).unwrap();
    assert!(graph.is_ancestor_of(cc, path.filename).unwrap());
    assert!(graph.is_descendant_of(path.format, cc).unwrap());
    assert!(!graph.is_ancestor_of(cc, path.channel_config).unwrap());
}
