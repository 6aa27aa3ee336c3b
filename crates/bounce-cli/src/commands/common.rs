//! Shared CLI helpers used across multiple commands.

use std::path::PathBuf;

use bounce_config::{ExportProfile, ProfileSchema, find_profile, get_factory_profile};
use bounce_core::{ExportGraph, Payload};

/// Load a profile by name or path.
///
/// Searches in this order:
/// 1. Factory profiles (by identifier or display name)
/// 2. User profiles (by name)
/// 3. File path
pub fn load_profile(name: &str) -> anyhow::Result<ExportProfile> {
    if let Some(profile) = get_factory_profile(name) {
        tracing::debug!(profile = name, "using factory profile");
        return Ok(profile);
    }

    if let Some(path) = find_profile(name) {
        tracing::debug!(path = %path.display(), "loading profile");
        return Ok(ExportProfile::load(&path)?);
    }

    let path = PathBuf::from(name);
    if path.exists() {
        return Ok(ExportProfile::load(&path)?);
    }

    anyhow::bail!(
        "Profile '{}' not found. Use 'bounce profiles list' to see available profiles.",
        name
    )
}

/// Build the export graph of a profile, auditing it in debug builds.
pub fn build_graph(profile: &ExportProfile) -> anyhow::Result<ExportGraph<ProfileSchema>> {
    let graph = profile.build_graph()?;
    debug_assert!(graph.check_invariants().is_ok());
    tracing::info!(
        profile = %profile.name,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        jobs = graph.job_count(),
        "graph built"
    );
    Ok(graph)
}

/// One-line summary of a node payload.
pub fn describe(payload: &Payload<ProfileSchema>) -> String {
    match payload {
        Payload::Timespan(ranges) => ranges
            .iter()
            .map(|r| format!("{} [{}..{}]", r.name, r.start, r.end))
            .collect::<Vec<_>>()
            .join(", "),
        Payload::ChannelConfig(c) => {
            let split = if c.split { ", split" } else { "" };
            format!("{} ({}ch{split})", c.name, c.channels)
        }
        Payload::Format(f) => {
            let depth = if f.codec.is_lossy() {
                String::new()
            } else {
                format!("/{}bit", f.bit_depth)
            };
            let normalize = if f.normalize { ", normalized" } else { "" };
            format!("{} ({} {}Hz{depth}{normalize})", f.name, f.codec, f.sample_rate)
        }
        Payload::Filename(p) if p.folder.is_empty() => p.template.clone(),
        Payload::Filename(p) => format!("{}/{}", p.folder, p.template),
    }
}
