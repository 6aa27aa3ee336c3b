//! List the export jobs a profile expands into.

use bounce_config::{Codec, ProfileSchema};
use bounce_core::ExportJob;
use clap::Args;
use serde::Serialize;

use super::common::{build_graph, load_profile};

#[derive(Args)]
pub struct JobsArgs {
    /// Profile name or path to a profile TOML file
    profile: String,

    /// Session name substituted for `{session}` (defaults to the profile name)
    #[arg(short, long)]
    session: Option<String>,

    /// Print jobs as a JSON array
    #[arg(long)]
    json: bool,

    /// Only print the number of jobs
    #[arg(long, conflicts_with = "json")]
    count: bool,
}

/// A job flattened for display.
#[derive(Debug, Serialize)]
struct JobRow<'a> {
    range: &'a str,
    start: u64,
    end: u64,
    channels: &'a str,
    channel_count: u32,
    split_channels: bool,
    format: &'a str,
    codec: Codec,
    sample_rate: u32,
    bit_depth: u16,
    normalize: bool,
    path: String,
}

impl<'a> JobRow<'a> {
    fn new(job: &ExportJob<'a, ProfileSchema>, session: &str) -> Self {
        let ExportJob {
            time_range,
            channel_config,
            format,
            filename,
            ..
        } = *job;
        Self {
            range: &time_range.name,
            start: time_range.start,
            end: time_range.end,
            channels: &channel_config.name,
            channel_count: channel_config.channels,
            split_channels: channel_config.split,
            format: &format.name,
            codec: format.codec,
            sample_rate: format.sample_rate,
            bit_depth: format.bit_depth,
            normalize: format.normalize,
            path: filename.render(session, time_range, channel_config, format),
        }
    }
}

pub fn run(args: JobsArgs) -> anyhow::Result<()> {
    let profile = load_profile(&args.profile)?;
    let graph = build_graph(&profile)?;

    if args.count {
        println!("{}", graph.job_count());
        return Ok(());
    }

    let session = args.session.as_deref().unwrap_or(&profile.name);
    let jobs = graph.materialize();
    let rows: Vec<JobRow<'_>> = jobs.iter().map(|job| JobRow::new(job, session)).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Jobs for '{}' ({}):", profile.name, rows.len());
    println!();
    println!(
        "  {:>3}  {:16} {:>10} {:>10}  {:10} {:12}  {}",
        "#", "range", "start", "end", "channels", "format", "path"
    );
    for (i, row) in rows.iter().enumerate() {
        println!(
            "  {:>3}  {:16} {:>10} {:>10}  {:10} {:12}  {}",
            i + 1,
            row.range,
            row.start,
            row.end,
            row.channels,
            row.format,
            row.path
        );
    }

    Ok(())
}
