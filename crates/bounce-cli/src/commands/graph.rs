//! Show the export graph a profile builds.

use bounce_core::Level;
use clap::Args;

use super::common::{build_graph, describe, load_profile};

#[derive(Args)]
pub struct GraphArgs {
    /// Profile name or path to a profile TOML file
    profile: String,

    /// Show only one level (timespan, channel_config, format, filename)
    #[arg(short, long, value_parser = parse_level)]
    level: Option<Level>,

    /// Fail if the graph violates a structural invariant
    #[arg(long)]
    check: bool,
}

fn parse_level(s: &str) -> Result<Level, String> {
    Level::ALL
        .into_iter()
        .find(|level| level.name() == s)
        .ok_or_else(|| {
            format!("Unknown level '{s}' (expected timespan, channel_config, format, or filename)")
        })
}

pub fn run(args: GraphArgs) -> anyhow::Result<()> {
    let profile = load_profile(&args.profile)?;
    let graph = build_graph(&profile)?;

    if args.check {
        graph.check_invariants()?;
    }

    let snapshot = graph.snapshot();
    let levels: Vec<Level> = match args.level {
        Some(level) => vec![level],
        None => Level::ALL.to_vec(),
    };

    println!("Graph: {}", profile.name);
    println!("{}", "=".repeat(7 + profile.name.len()));
    println!(
        "{} nodes, {} edges, {} jobs",
        graph.node_count(),
        graph.edge_count(),
        graph.job_count()
    );

    for level in levels {
        println!();
        println!("{level}:");
        for entry in snapshot.level(level) {
            let marker = if entry.selected { "*" } else { " " };
            let label = graph.payload(entry.id).map(describe)?;
            println!("  {marker}{:>3}  {:<10} {label}", entry.position, entry.id.to_string());
            if !entry.parents.is_empty() {
                println!("          parents:  {}", join_ids(&entry.parents));
            }
            if !entry.children.is_empty() {
                println!("          children: {}", join_ids(&entry.children));
            }
        }
    }

    Ok(())
}

fn join_ids(ids: &[bounce_core::NodeId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
