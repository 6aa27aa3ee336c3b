//! Platform-specific paths for export profiles.
//!
//! # Directory Structure
//!
//! - **User profiles**: `~/.config/bounce/profiles/` (Linux),
//!   `~/Library/Application Support/bounce/profiles/` (macOS),
//!   `%APPDATA%\bounce\profiles\` (Windows)
//! - **User config**: `~/.config/bounce/` (Linux),
//!   `~/Library/Application Support/bounce/` (macOS), `%APPDATA%\bounce\` (Windows)
//!
//! # Example
//!
//! ```rust,no_run
//! use bounce_config::paths;
//!
//! if let Some(path) = paths::find_profile("album_master") {
//!     println!("Found profile at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "bounce";

/// Subdirectory name for profiles.
const PROFILES_SUBDIR: &str = "profiles";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific profiles directory.
pub fn user_profiles_dir() -> PathBuf {
    user_config_dir().join(PROFILES_SUBDIR)
}

/// Find a profile file by name.
///
/// `name` may be a path to a TOML file, or a profile name (with or without
/// `.toml`) looked up in the user profiles directory.
pub fn find_profile(name: &str) -> Option<PathBuf> {
    find_profile_in(name, &user_profiles_dir())
}

fn find_profile_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Ensure the user profiles directory exists.
pub fn ensure_user_profiles_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_profiles_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List all profile files in the user profiles directory, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_profiles() -> Vec<PathBuf> {
    list_profiles_in_dir(&user_profiles_dir())
}

fn list_profiles_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut profiles: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    profiles.sort();
    profiles
}

/// Get the profile name from a file path (the file stem).
///
/// ```rust
/// use bounce_config::paths::profile_name_from_path;
/// use std::path::Path;
///
/// let name = profile_name_from_path(Path::new("/path/to/album_master.toml"));
/// assert_eq!(name, Some("album_master".to_string()));
/// ```
pub fn profile_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
