//! Integration tests for bounce-config.
//!
//! These tests verify end-to-end functionality across modules.

use bounce_config::{
    ChannelConfig, Codec, ConfigError, ExportProfile, FilenamePattern, FormatSpec, LevelName,
    NodeValue, Operation, PathConfig, TimeRange, factory_profiles, get_factory_profile,
};
use bounce_core::{GraphError, Level};
use tempfile::TempDir;

fn seed() -> PathConfig {
    PathConfig {
        ranges: vec![
            TimeRange::new("a", 0, 48_000),
            TimeRange::new("b", 48_000, 96_000),
        ],
        channel_config: ChannelConfig::new("stereo", 2),
        format: FormatSpec::new("master", Codec::Wav),
        filename: FilenamePattern::new("{range}-{format}").in_folder("out"),
    }
}

/// Test profile save/load roundtrip builds the same graph.
#[test]
fn test_profile_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let profile_path = temp_dir.path().join("nested").join("profile.toml");

    let original = ExportProfile::new("Roundtrip")
        .with_description("Testing save/load")
        .with_path(seed())
        .with_operation(Operation::Split {
            level: LevelName::Format,
            index: 0,
            position: 0.5,
            with: Some(NodeValue::Format(FormatSpec::new("lossless", Codec::Flac))),
        })
        .with_operation(Operation::Select {
            level: LevelName::Format,
            index: 1,
            selected: true,
        });

    original.save(&profile_path).expect("should save profile");
    let loaded = ExportProfile::load(&profile_path).expect("should load profile");
    assert_eq!(loaded, original);

    let a = original.build_graph().unwrap();
    let b = loaded.build_graph().unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.job_count(), 4);
}

/// Every factory profile builds a well-formed graph with at least one job.
#[test]
fn test_factory_profiles_build() {
    let profiles = factory_profiles();
    assert!(!profiles.is_empty(), "should have factory profiles");

    for profile in profiles {
        let graph = profile
            .build_graph()
            .unwrap_or_else(|e| panic!("factory profile '{}' failed: {e}", profile.name));
        graph.check_invariants().unwrap();
        assert!(graph.job_count() > 0, "profile '{}' produced no jobs", profile.name);
    }
}

/// Rendered filenames for the album master are distinct.
#[test]
fn test_album_master_filenames_unique() {
    let graph = get_factory_profile("album_master")
        .unwrap()
        .build_graph()
        .unwrap();
    let mut files: Vec<String> = graph
        .materialize()
        .iter()
        .map(|j| {
            j.filename
                .render("album", j.time_range, j.channel_config, j.format)
        })
        .collect();
    assert_eq!(files[0], "album/01-intro-cd.wav");
    files.sort();
    files.dedup();
    assert_eq!(files.len(), 9);
}

/// Removing a format purges the filename it orphaned; the channel config stays.
#[test]
fn test_remove_operation_purges() {
    let profile = ExportProfile::new("Purge")
        .with_path(seed())
        .with_path(seed())
        .with_operation(Operation::Remove {
            level: LevelName::Format,
            index: 0,
        });
    let graph = profile.build_graph().unwrap();
    assert_eq!(graph.nodes(Level::Timespan).len(), 2);
    assert_eq!(graph.nodes(Level::ChannelConfig).len(), 2);
    assert_eq!(graph.nodes(Level::Format).len(), 1);
    assert_eq!(graph.nodes(Level::Filename).len(), 1);
    assert_eq!(graph.job_count(), 2);
    graph.check_invariants().unwrap();
}

/// Operations on a removed level surface the range error, not a panic.
#[test]
fn test_operation_after_full_removal() {
    let profile = ExportProfile::new("Gone")
        .with_path(seed())
        .with_operation(Operation::Remove {
            level: LevelName::Timespan,
            index: 0,
        })
        .with_operation(Operation::Split {
            level: LevelName::Filename,
            index: 0,
            position: 0.5,
            with: None,
        });
    let err = profile.build_graph().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NodeOutOfRange {
            step: 1,
            level: Level::Filename,
            available: 0,
            ..
        }
    ));
}

/// Graph-level rejections are wrapped.
#[test]
fn test_invalid_position_from_toml() {
    let toml = r#"
name = "Bad"

[[paths]]
ranges = [{ name = "a", start = 0, end = 1 }]
channel_config = { name = "stereo", channels = 2 }
format = { name = "m", codec = "wav" }
filename = { template = "x" }

[[operations]]
op = "split"
level = "format"
index = 0
position = inf
"#;
    let err = ExportProfile::from_toml(toml).unwrap().build_graph().unwrap_err();
    assert!(matches!(err, ConfigError::Graph(GraphError::InvalidPosition(_))));
}

/// Malformed TOML is a parse error.
#[test]
fn test_unknown_operation_rejected() {
    let toml = r#"
name = "Bad"

[[operations]]
op = "merge"
level = "format"
index = 0
"#;
    assert!(matches!(
        ExportProfile::from_toml(toml),
        Err(ConfigError::TomlParse(_))
    ));
}

/// Loading a missing file reports the path.
#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.toml");
    let err = ExportProfile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("missing.toml"));
}
