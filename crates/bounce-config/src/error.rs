//! Error types for configuration operations.

use std::path::PathBuf;

use bounce_core::{GraphError, Level};
use thiserror::Error;

/// Errors that can occur while loading, saving, or applying export profiles.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A profile must seed at least one path
    #[error("profile '{0}' has no paths")]
    EmptyProfile(String),

    /// An operation addressed a node past the end of its level
    #[error("operation {step}: no {level} node at index {index} ({available} available)")]
    NodeOutOfRange {
        /// Zero-based position of the operation in the profile.
        step: usize,
        /// Level the operation addressed.
        level: Level,
        /// Requested index.
        index: usize,
        /// Number of nodes on that level when the operation ran.
        available: usize,
    },

    /// A replacement payload was given for a node of another level
    #[error("operation {step}: {found} value cannot replace a {expected} payload")]
    ValueLevel {
        /// Zero-based position of the operation in the profile.
        step: usize,
        /// Level of the addressed node.
        expected: Level,
        /// Level of the supplied value.
        found: Level,
    },

    /// The graph rejected an operation
    #[error("graph operation failed: {0}")]
    Graph(#[from] GraphError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = ConfigError::read_file("/some/path", mock_io_err());
        let ConfigError::ReadFile { ref path, .. } = err else {
            panic!("expected ReadFile, got {err:?}");
        };
        assert_eq!(path, std::path::Path::new("/some/path"));
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn write_file_display() {
        let err = ConfigError::write_file("/a/b.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to write file"), "got: {msg}");
        assert!(msg.contains("/a/b.toml"), "got: {msg}");
    }

    #[test]
    fn create_dir_display() {
        let err = ConfigError::create_dir("/a/b", mock_io_err());
        assert!(err.to_string().contains("failed to create directory"));
    }

    #[test]
    fn node_out_of_range_display() {
        let err = ConfigError::NodeOutOfRange {
            step: 2,
            level: Level::Format,
            index: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "operation 2: no format node at index 5 (3 available)"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn graph_error_wraps_with_source() {
        let err: ConfigError = GraphError::InvalidPosition(f32::NAN).into();
        assert!(matches!(err, ConfigError::Graph(_)));
        assert!(err.to_string().starts_with("graph operation failed"));
    }

    #[test]
    fn empty_profile_display() {
        let err = ConfigError::EmptyProfile("blank".to_string());
        assert_eq!(err.to_string(), "profile 'blank' has no paths");
    }
}
