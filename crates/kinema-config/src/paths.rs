//! Platform-specific paths for presets and configuration.
//!
//! # Directory Structure
//!
//! - **User presets**: `~/.config/kinema/presets/` (Linux), `~/Library/Application Support/kinema/presets/` (macOS), `%APPDATA%\kinema\presets\` (Windows)
//! - **User config**: `~/.config/kinema/` (Linux), `~/Library/Application Support/kinema/` (macOS), `%APPDATA%\kinema\` (Windows)
//!
//! # Example
//!
//! ```rust,no_run
//! use kinema_config::paths;
//!
//! // Find a preset by name (path, then user directory)
//! if let Some(path) = paths::find_preset("drawer_tall") {
//!     println!("Found preset at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "kinema";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform config directory
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Find a preset file by name.
///
/// The name can be a path to a TOML file, or a preset name (with or
/// without `.toml`) looked up in `dir`.
fn find_preset_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };

    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Find a preset file by path or by name in the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

/// Ensure the user presets directory exists.
///
/// Creates the directory and any parent directories if they don't exist.
pub fn ensure_user_presets_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_presets_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// List all preset files in the user presets directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Get the preset name from a file path (the file stem).
///
/// ```rust
/// use kinema_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/drawer_tall.toml"));
/// assert_eq!(name, Some("drawer_tall".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
