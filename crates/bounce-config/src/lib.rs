//! Export payloads and profiles for bounce.
//!
//! This crate gives the opaque payloads of `bounce-core`'s graph a concrete
//! shape and lets a whole export graph be described in a TOML file.
//!
//! # Features
//!
//! - **Payloads**: [`TimeRange`], [`ChannelConfig`], [`FormatSpec`], [`FilenamePattern`],
//!   bound to the graph by [`ProfileSchema`]
//! - **Profiles**: seed paths plus a replayable list of split/set/remove/select edits
//! - **Paths**: Platform-specific profile directories
//! - **Factory Profiles**: Built-in profiles for common deliveries
//!
//! # Example
//!
//! ```rust
//! use bounce_config::{
//!     ChannelConfig, Codec, ExportProfile, FilenamePattern, FormatSpec, LevelName, NodeValue,
//!     Operation, PathConfig, TimeRange,
//! };
//!
//! let profile = ExportProfile::new("Demo")
//!     .with_path(PathConfig {
//!         ranges: vec![TimeRange::new("take1", 0, 480_000)],
//!         channel_config: ChannelConfig::new("stereo", 2),
//!         format: FormatSpec::new("master", Codec::Wav),
//!         filename: FilenamePattern::new("{range}-{format}"),
//!     })
//!     .with_operation(Operation::Split {
//!         level: LevelName::Format,
//!         index: 0,
//!         position: 0.5,
//!         with: Some(NodeValue::Format(FormatSpec::new("web", Codec::Mp3))),
//!     });
//!
//! let graph = profile.build_graph()?;
//! let files: Vec<String> = graph
//!     .materialize()
//!     .iter()
//!     .map(|j| j.filename.render("demo", j.time_range, j.channel_config, j.format))
//!     .collect();
//! assert_eq!(files, vec!["take1-master.wav", "take1-web.mp3"]);
//! # Ok::<(), bounce_config::ConfigError>(())
//! ```

mod error;
mod payload;
mod profile;

/// Platform-specific paths for profiles.
pub mod paths;

/// Factory profiles bundled with the library.
pub mod factory_profiles;

pub use error::ConfigError;
pub use factory_profiles::{
    factory_profile_names, factory_profiles, get_factory_profile, is_factory_profile,
};
pub use paths::{
    ensure_user_profiles_dir, find_profile, list_user_profiles, profile_name_from_path,
    user_config_dir, user_profiles_dir,
};
pub use payload::{
    ChannelConfig, Codec, FilenamePattern, FormatSpec, NodeValue, ProfileSchema, TimeRange,
};
pub use profile::{ExportProfile, LevelName, Operation, PathConfig};
