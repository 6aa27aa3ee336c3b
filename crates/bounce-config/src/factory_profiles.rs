//! Factory export profiles bundled with the library.
//!
//! Always available without external files; they double as worked examples of
//! the profile format.

use crate::ExportProfile;

/// TOML content for factory profiles, keyed by identifier.
static FACTORY_PROFILES_TOML: &[(&str, &str)] = &[
    ("quick_mix", QUICK_MIX_PROFILE),
    ("album_master", ALBUM_MASTER_PROFILE),
    ("stereo_and_mono", STEREO_AND_MONO_PROFILE),
];

/// One stereo WAV of the whole session.
const QUICK_MIX_PROFILE: &str = r#"
name = "Quick Mix"
description = "Whole session as a single stereo 24-bit WAV"

[[paths]]
ranges = [{ name = "session", start = 0, end = 14400000 }]
channel_config = { name = "stereo", channels = 2 }
format = { name = "mix", codec = "wav" }
filename = { template = "{session}" }
"#;

/// Every track in CD, hi-res, and web formats.
const ALBUM_MASTER_PROFILE: &str = r#"
name = "Album Master"
description = "Three tracks, each as CD WAV, hi-res FLAC, and web MP3"

[[paths]]
ranges = [
    { name = "01-intro", start = 0, end = 4320000 },
    { name = "02-verse", start = 4320000, end = 12960000 },
    { name = "03-outro", start = 12960000, end = 17280000 },
]
channel_config = { name = "stereo", channels = 2 }
format = { name = "cd", codec = "wav", sample_rate = 44100, bit_depth = 16 }
filename = { folder = "album", template = "{range}-{format}" }

[[operations]]
op = "split"
level = "format"
index = 0
[operations.with.format]
name = "hires"
codec = "flac"
sample_rate = 96000

[[operations]]
op = "split"
level = "format"
index = 1
[operations.with.format]
name = "web"
codec = "mp3"
sample_rate = 44100
normalize = true
"#;

/// Stereo WAV and a mono MP3 reference from one seed, via a parent partition.
const STEREO_AND_MONO_PROFILE: &str = r#"
name = "Stereo and Mono"
description = "Stereo WAV master plus a mono MP3 reference"

[[paths]]
ranges = [{ name = "full", start = 0, end = 14400000 }]
channel_config = { name = "stereo", channels = 2 }
format = { name = "master", codec = "wav" }
filename = { template = "{session}-{channels}" }

# Both channel configs now share the WAV format.
[[operations]]
op = "split"
level = "channel_config"
index = 0
[operations.with.channel_config]
name = "mono"
channels = 1

# The second parent (mono) moves to the MP3 copy.
[[operations]]
op = "split"
level = "format"
index = 0
position = 0.5
[operations.with.format]
name = "reference"
codec = "mp3"
"#;

/// Get all factory profiles.
pub fn factory_profiles() -> Vec<ExportProfile> {
    FACTORY_PROFILES_TOML
        .iter()
        .filter_map(|(_, toml)| ExportProfile::from_toml(toml).ok())
        .collect()
}

/// Get a factory profile by identifier or display name, case-insensitively.
///
/// ```rust
/// use bounce_config::get_factory_profile;
///
/// let profile = get_factory_profile("album_master").unwrap();
/// assert_eq!(profile.name, "Album Master");
/// ```
pub fn get_factory_profile(name: &str) -> Option<ExportProfile> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PROFILES_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return ExportProfile::from_toml(toml).ok();
    }

    factory_profiles()
        .into_iter()
        .find(|profile| profile.name.to_lowercase() == name_lower)
}

/// Identifiers of all factory profiles.
pub fn factory_profile_names() -> Vec<&'static str> {
    FACTORY_PROFILES_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory profile.
pub fn is_factory_profile(name: &str) -> bool {
    get_factory_profile(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Codec;
    use bounce_core::Level;

    #[test]
    fn test_all_factory_profiles_valid() {
        for (name, toml) in FACTORY_PROFILES_TOML {
            let result = ExportProfile::from_toml(toml);
            assert!(result.is_ok(), "factory profile '{}' should parse: {:?}", name, result);

            let profile = result.unwrap();
            assert!(profile.description.is_some(), "profile '{}' should have a description", name);
            let graph = profile.build_graph();
            assert!(graph.is_ok(), "profile '{}' should build: {:?}", name, graph.err());
        }
    }

    #[test]
    fn test_get_factory_profile() {
        let profile = get_factory_profile("quick_mix").expect("quick_mix should exist");
        assert_eq!(profile.name, "Quick Mix");

        let profile = get_factory_profile("Album Master").expect("display name should match");
        assert_eq!(profile.name, "Album Master");

        assert!(get_factory_profile("QUICK_MIX").is_some());
        assert!(get_factory_profile("nonexistent").is_none());
    }

    #[test]
    fn test_factory_profile_names() {
        let names = factory_profile_names();
        assert_eq!(names, vec!["quick_mix", "album_master", "stereo_and_mono"]);
        assert!(is_factory_profile("stereo_and_mono"));
        assert!(!is_factory_profile("my_custom_profile"));
    }

    #[test]
    fn test_album_master_job_grid() {
        let graph = get_factory_profile("album_master")
            .unwrap()
            .build_graph()
            .unwrap();
        assert_eq!(graph.nodes(Level::Format).len(), 3);
        assert_eq!(graph.nodes(Level::Filename).len(), 1);

        let jobs = graph.materialize();
        assert_eq!(jobs.len(), 9);
        let codecs: Vec<Codec> = jobs.iter().take(3).map(|j| j.format.codec).collect();
        assert_eq!(codecs, vec![Codec::Wav, Codec::Flac, Codec::Mp3]);
    }

    #[test]
    fn test_stereo_and_mono_partitions_format() {
        let graph = get_factory_profile("stereo_and_mono")
            .unwrap()
            .build_graph()
            .unwrap();
        let pairs: Vec<(u32, Codec)> = graph
            .materialize()
            .iter()
            .map(|j| (j.channel_config.channels, j.format.codec))
            .collect();
        assert_eq!(pairs, vec![(2, Codec::Wav), (1, Codec::Mp3)]);
    }
}
