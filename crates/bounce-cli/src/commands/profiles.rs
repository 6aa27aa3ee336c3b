//! Profile management commands.
//!
//! Provides commands to list, show, and copy export profiles.

use bounce_config::{
    ExportProfile, ensure_user_profiles_dir, factory_profile_names, get_factory_profile,
    list_user_profiles, profile_name_from_path, user_profiles_dir,
};
use clap::{Args, Subcommand};

use super::common::load_profile;

#[derive(Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    command: ProfilesCommand,
}

#[derive(Subcommand)]
enum ProfilesCommand {
    /// List available profiles (factory and user)
    List {
        /// Show only factory profiles
        #[arg(long)]
        factory: bool,

        /// Show only user profiles
        #[arg(long)]
        user: bool,
    },

    /// Show a profile as TOML
    Show {
        /// Profile name or path
        name: String,
    },

    /// Copy a factory profile to user profiles for customization
    Copy {
        /// Factory profile name
        source: String,

        /// New profile file name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite if the profile already exists
        #[arg(long)]
        force: bool,
    },

    /// Show profile directories
    Paths,
}

pub fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    match args.command {
        ProfilesCommand::List { factory, user } => list_profiles(factory, user),
        ProfilesCommand::Show { name } => show_profile(&name),
        ProfilesCommand::Copy {
            source,
            name,
            force,
        } => copy_profile(&source, name.as_deref(), force),
        ProfilesCommand::Paths => show_paths(),
    }
}

fn list_profiles(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Profiles:");
        println!("=================");
        for id in factory_profile_names() {
            if let Some(profile) = get_factory_profile(id) {
                let desc = profile.description.as_deref().unwrap_or("");
                println!("  {:20} - {}", id, desc);
            }
        }
        println!();
    }

    if !factory_only {
        println!("User Profiles:");
        println!("==============");
        let user_profiles = list_user_profiles();
        if user_profiles.is_empty() {
            println!("  (none)");
            println!();
            println!("  Start from a factory profile with: bounce profiles copy <name>");
        } else {
            for path in user_profiles {
                let name = profile_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
                match ExportProfile::load(&path) {
                    Ok(profile) => {
                        let desc = profile.description.as_deref().unwrap_or("");
                        println!("  {:20} - {}", name, desc);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "failed to load profile: {e}");
                        println!("  {:20} - (error loading)", name);
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show_profile(name: &str) -> anyhow::Result<()> {
    let profile = load_profile(name)?;

    println!("Profile: {}", profile.name);
    println!("{}", "=".repeat(9 + profile.name.len()));
    if let Some(desc) = &profile.description {
        println!("Description: {}", desc);
    }
    println!(
        "{} seed path(s), {} operation(s)",
        profile.paths.len(),
        profile.operations.len()
    );
    println!();
    print!("{}", profile.to_toml()?);

    Ok(())
}

fn copy_profile(source: &str, name: Option<&str>, force: bool) -> anyhow::Result<()> {
    let Some(profile) = get_factory_profile(source) else {
        anyhow::bail!(
            "Factory profile '{}' not found. Use 'bounce profiles list --factory' to see them.",
            source
        );
    };

    ensure_user_profiles_dir()?;
    let file_name = name.unwrap_or(source);
    let path = user_profiles_dir().join(format!("{file_name}.toml"));
    if path.exists() && !force {
        anyhow::bail!(
            "Profile '{}' already exists. Use --force to overwrite.",
            file_name
        );
    }

    profile.save(&path)?;
    tracing::info!(path = %path.display(), "profile copied");
    println!("Copied '{}' to {}", profile.name, path.display());

    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    let dir = user_profiles_dir();
    let status = if dir.exists() { "" } else { " (not created yet)" };
    println!("User profiles: {}{}", dir.display(), status);
    Ok(())
}
