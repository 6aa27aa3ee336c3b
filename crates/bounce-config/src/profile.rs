//! Export profile file format and graph construction.

use std::path::Path;

use bounce_core::{ExportGraph, Level, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::payload::{
    ChannelConfig, FilenamePattern, FormatSpec, NodeValue, ProfileSchema, TimeRange,
};

/// Graph level as written in profile files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LevelName {
    /// Root level.
    Timespan,
    /// Channel routing level.
    ChannelConfig,
    /// Encoding level.
    Format,
    /// Naming level.
    Filename,
}

impl From<LevelName> for Level {
    fn from(name: LevelName) -> Self {
        match name {
            LevelName::Timespan => Level::Timespan,
            LevelName::ChannelConfig => Level::ChannelConfig,
            LevelName::Format => Level::Format,
            LevelName::Filename => Level::Filename,
        }
    }
}

/// One independent root-to-leaf chain seeded into the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathConfig {
    /// Time ranges of the root.
    pub ranges: Vec<TimeRange>,
    /// Channel routing.
    pub channel_config: ChannelConfig,
    /// Encoding settings.
    pub format: FormatSpec,
    /// Output naming.
    pub filename: FilenamePattern,
}

/// One edit replayed on the seeded graph.
///
/// Nodes are addressed by `(level, index)`: the index into that level's node
/// order *at the time the operation runs*. A split-off node always lands
/// right after its source, so `index + 1` addresses it in later steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Split a node, optionally giving the copy its own payload.
    Split {
        /// Level of the node.
        level: LevelName,
        /// Index within the level.
        index: usize,
        /// Share of parents that stay with the original (defaults to 0.5).
        #[serde(default = "default_position")]
        position: f32,
        /// Replacement payload for the split-off node.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        with: Option<NodeValue>,
    },
    /// Replace a node's payload.
    Set {
        /// Level of the node.
        level: LevelName,
        /// Index within the level.
        index: usize,
        /// New payload.
        with: NodeValue,
    },
    /// Remove a node and purge what it orphans.
    Remove {
        /// Level of the node.
        level: LevelName,
        /// Index within the level.
        index: usize,
    },
    /// Set a node's selection flag.
    Select {
        /// Level of the node.
        level: LevelName,
        /// Index within the level.
        index: usize,
        /// New flag (defaults to `true`).
        #[serde(default = "default_selected")]
        selected: bool,
    },
}

fn default_position() -> f32 {
    0.5
}

fn default_selected() -> bool {
    true
}

/// Export profile: seed paths plus the edits that specialise them.
///
/// # TOML Format
///
/// ```toml
/// name = "Album Master"
/// description = "CD and streaming masters"
///
/// [[paths]]
/// ranges = [{ name = "full", start = 0, end = 14400000 }]
/// channel_config = { name = "stereo", channels = 2 }
/// format = { name = "CD", codec = "wav", bit_depth = 16, sample_rate = 44100 }
/// filename = { template = "{session}-{format}" }
///
/// [[operations]]
/// op = "split"
/// level = "format"
/// index = 0
/// [operations.with.format]
/// name = "Stream"
/// codec = "flac"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportProfile {
    /// Name of the profile.
    pub name: String,

    /// Optional description of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Seed chains, in root order.
    #[serde(default)]
    pub paths: Vec<PathConfig>,

    /// Edits replayed after seeding, in order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl ExportProfile {
    /// Create a new empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            paths: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Create a profile with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a seed path.
    pub fn with_path(mut self, path: PathConfig) -> Self {
        self.paths.push(path);
        self
    }

    /// Add an operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let profile: ExportProfile = toml::from_str(&content)?;
        Ok(profile)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the profile to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Seeds a graph with every path and replays the operations.
    ///
    /// Fails on the first operation that cannot be applied; nothing is
    /// returned in that case.
    pub fn build_graph(&self) -> Result<ExportGraph<ProfileSchema>, ConfigError> {
        let (first, rest) = self
            .paths
            .split_first()
            .ok_or_else(|| ConfigError::EmptyProfile(self.name.clone()))?;

        let mut graph = ExportGraph::new();
        graph.create_empty_config(
            first.ranges.clone(),
            first.channel_config.clone(),
            first.format.clone(),
            first.filename.clone(),
        );
        for path in rest {
            graph.add_path(
                path.ranges.clone(),
                path.channel_config.clone(),
                path.format.clone(),
                path.filename.clone(),
            );
        }

        for (step, operation) in self.operations.iter().enumerate() {
            apply(&mut graph, step, operation)?;
        }
        Ok(graph)
    }
}

impl Default for ExportProfile {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

fn apply(
    graph: &mut ExportGraph<ProfileSchema>,
    step: usize,
    operation: &Operation,
) -> Result<(), ConfigError> {
    match operation {
        Operation::Split {
            level,
            index,
            position,
            with,
        } => {
            let node = resolve(graph, step, *level, *index)?;
            if let Some(value) = with {
                check_value(step, *level, value)?;
            }
            let copy = graph.split(node, *position)?;
            if let Some(value) = with {
                graph.set_payload(copy, value.clone().into())?;
            }
        }
        Operation::Set { level, index, with } => {
            let node = resolve(graph, step, *level, *index)?;
            check_value(step, *level, with)?;
            graph.set_payload(node, with.clone().into())?;
        }
        Operation::Remove { level, index } => {
            let node = resolve(graph, step, *level, *index)?;
            graph.remove(node)?;
        }
        Operation::Select {
            level,
            index,
            selected,
        } => {
            let node = resolve(graph, step, *level, *index)?;
            graph.select(node, *selected)?;
        }
    }
    Ok(())
}

fn resolve(
    graph: &ExportGraph<ProfileSchema>,
    step: usize,
    level: LevelName,
    index: usize,
) -> Result<NodeId, ConfigError> {
    let level = Level::from(level);
    let nodes = graph.nodes(level);
    nodes
        .get(index)
        .copied()
        .ok_or(ConfigError::NodeOutOfRange {
            step,
            level,
            index,
            available: nodes.len(),
        })
}

fn check_value(step: usize, level: LevelName, value: &NodeValue) -> Result<(), ConfigError> {
    let expected = Level::from(level);
    if value.level() == expected {
        Ok(())
    } else {
        Err(ConfigError::ValueLevel {
            step,
            expected,
            found: value.level(),
        })
    }
}
