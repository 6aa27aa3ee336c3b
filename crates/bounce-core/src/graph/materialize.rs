//! Materialization — expand the graph into concrete export jobs.
//!
//! Every root-to-leaf path yields one job per time range in its root's
//! payload. The walk is read-only; a node reached through several paths is
//! visited once per path.

use core::fmt;

use super::export_graph::{ConfigPath, ExportGraph};
use super::node::{ExportSchema, Level, NodeData, NodeId};

/// One concrete export job: a time range rendered through one channel
/// configuration into one format under one filename pattern.
pub struct ExportJob<'a, S: ExportSchema> {
    /// The time range to render.
    pub time_range: &'a S::TimeRange,
    /// Channel routing payload.
    pub channel_config: &'a S::ChannelConfig,
    /// Format payload.
    pub format: &'a S::Format,
    /// Filename pattern payload.
    pub filename: &'a S::Filename,
    /// The nodes the job was expanded from.
    pub path: ConfigPath,
}

impl<S: ExportSchema> Clone for ExportJob<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ExportSchema> Copy for ExportJob<'_, S> {}

impl<S: ExportSchema> fmt::Debug for ExportJob<'_, S>
where
    S::TimeRange: fmt::Debug,
    S::ChannelConfig: fmt::Debug,
    S::Format: fmt::Debug,
    S::Filename: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportJob")
            .field("time_range", self.time_range)
            .field("channel_config", self.channel_config)
            .field("format", self.format)
            .field("filename", self.filename)
            .field("path", &self.path)
            .finish()
    }
}

/// Receiver for materialized jobs (the export pipeline's entry point).
pub trait JobSink<'a, S: ExportSchema> {
    /// Accepts one job.
    fn accept(&mut self, job: ExportJob<'a, S>);
}

impl<'a, S: ExportSchema> JobSink<'a, S> for Vec<ExportJob<'a, S>> {
    fn accept(&mut self, job: ExportJob<'a, S>) {
        self.push(job);
    }
}

impl<S: ExportSchema> ExportGraph<S> {
    /// Expands the graph into jobs, in level order.
    pub fn materialize(&self) -> Vec<ExportJob<'_, S>> {
        let mut jobs = Vec::with_capacity(self.job_count());
        self.materialize_into(&mut jobs);
        jobs
    }

    /// Hands every job to `sink`, in level order. Returns the number of jobs.
    ///
    /// Order: roots in level order, then each time range of the root, then
    /// channel configs, formats, and filenames in child order.
    pub fn materialize_into<'a, K: JobSink<'a, S>>(&'a self, sink: &mut K) -> usize {
        let mut emitted = 0;
        for &ts_id in self.nodes(Level::Timespan) {
            let Some(ts_node) = self.slot(ts_id) else { continue };
            let Some(ranges) = ts_node.payload.as_timespan() else {
                continue;
            };
            for time_range in ranges {
                for (cc_id, cc_node) in self.children_of(ts_node) {
                    let Some(channel_config) = cc_node.payload.as_channel_config() else {
                        continue;
                    };
                    for (format_id, format_node) in self.children_of(cc_node) {
                        let Some(format) = format_node.payload.as_format() else {
                            continue;
                        };
                        for (name_id, name_node) in self.children_of(format_node) {
                            let Some(filename) = name_node.payload.as_filename() else {
                                continue;
                            };
                            sink.accept(ExportJob {
                                time_range,
                                channel_config,
                                format,
                                filename,
                                path: ConfigPath {
                                    timespan: ts_id,
                                    channel_config: cc_id,
                                    format: format_id,
                                    filename: name_id,
                                },
                            });
                            emitted += 1;
                        }
                    }
                }
            }
        }
        emitted
    }

    /// Number of jobs [`materialize()`](Self::materialize) would produce.
    pub fn job_count(&self) -> usize {
        self.nodes(Level::Timespan)
            .iter()
            .filter_map(|&ts| self.slot(ts))
            .map(|ts_node| {
                let ranges = ts_node.payload.as_timespan().map_or(0, <[_]>::len);
                let leaves: usize = self
                    .children_of(ts_node)
                    .flat_map(|(_, cc_node)| self.children_of(cc_node))
                    .map(|(_, fmt_node)| fmt_node.children.len())
                    .sum();
                ranges * leaves
            })
            .sum()
    }

    fn children_of<'a>(
        &'a self,
        node: &'a NodeData<S>,
    ) -> impl Iterator<Item = (NodeId, &'a NodeData<S>)> + 'a {
        node.children
            .iter()
            .filter_map(move |&id| self.slot(id).map(|n| (id, n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Labels;

    impl ExportSchema for Labels {
        type TimeRange = u32;
        type ChannelConfig = &'static str;
        type Format = &'static str;
        type Filename = &'static str;
    }

    #[test]
    fn test_empty_config_yields_one_job() {
        let mut graph = ExportGraph::<Labels>::new();
        let path = graph.create_empty_config(vec![10], "stereo", "wav", "{name}");
        let jobs = graph.materialize();
        assert_eq!(jobs.len(), 1);
        assert_eq!(*jobs[0].time_range, 10);
        assert_eq!(*jobs[0].channel_config, "stereo");
        assert_eq!(*jobs[0].format, "wav");
        assert_eq!(*jobs[0].filename, "{name}");
        assert_eq!(jobs[0].path, path);
    }

    #[test]
    fn test_each_range_expands() {
        let mut graph = ExportGraph::<Labels>::new();
        let path = graph.create_empty_config(vec![1, 2, 3], "stereo", "wav", "{name}");
        graph.split(path.format, 0.5).unwrap();
        let ranges: Vec<u32> = graph.materialize().iter().map(|j| *j.time_range).collect();
        assert_eq!(ranges, vec![1, 1, 2, 2, 3, 3]);
        assert_eq!(graph.job_count(), 6);
    }

    #[test]
    fn test_shared_subtree_walked_per_path() {
        let mut graph = ExportGraph::<Labels>::new();
        let path = graph.create_empty_config(vec![1], "stereo", "wav", "{name}");
        graph.split(path.channel_config, 0.5).unwrap();
        graph.split(path.filename, 0.5).unwrap();

        // Two channel configs share one format, which has two filenames.
        assert_eq!(graph.nodes(Level::Format).len(), 1);
        let jobs = graph.materialize();
        assert_eq!(jobs.len(), 4);
        assert!(jobs.iter().all(|j| j.path.format == path.format));
    }

    #[test]
    fn test_order_follows_child_order() {
        let mut graph = ExportGraph::<Labels>::new();
        let path = graph.create_empty_config(vec![1], "stereo", "wav", "a");
        let flac = graph.split(path.format, 0.5).unwrap();
        graph
            .set_payload(flac, crate::graph::Payload::Format("flac"))
            .unwrap();
        let formats: Vec<&str> = graph.materialize().iter().map(|j| *j.format).collect();
        assert_eq!(formats, vec!["wav", "flac"]);
    }

    struct Counter(usize);

    impl<'a> JobSink<'a, Labels> for Counter {
        fn accept(&mut self, _job: ExportJob<'a, Labels>) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_custom_sink() {
        let mut graph = ExportGraph::<Labels>::new();
        let path = graph.create_empty_config(vec![1, 2], "stereo", "wav", "a");
        graph.split(path.timespan, 0.5).unwrap();
        let mut counter = Counter(0);
        assert_eq!(graph.materialize_into(&mut counter), 4);
        assert_eq!(counter.0, 4);
    }
}
