// ~/glasspane/glasspane-addon/src/paths.rs

use std::path::PathBuf;

use crate::{info, warn};

/// Root directory for GlassPane state (settings store + log file).
///
/// Resolution order: `GLASSPANE_ROOT` env override, then the platform
/// config directory, then the executable's own directory.
pub fn glasspane_root_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GLASSPANE_ROOT") {
        info!("GLASSPANE_ROOT override in effect: {dir}");
        return PathBuf::from(dir);
    }

    if let Some(config) = dirs_next::config_dir() {
        return config.join("glasspane");
    }

    warn!("Could not resolve a platform config directory, using the executable directory");
    exe_adjacent_dir()
}

fn exe_adjacent_dir() -> PathBuf {
    match std::env::current_exe() {
        Ok(path) => {
            if let Some(parent) = path.parent() {
                parent.to_path_buf()
            } else {
                warn!("Current executable has no parent, using current directory as glasspane root");
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
        Err(e) => {
            warn!("Failed to get current executable path: {e}, using current directory as glasspane root");
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}
