//! Loads the active identity configuration from git config files.
//!
//! The repository-local config wins; global locations are consulted only
//! when the local file has no `[user]` section.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::gitconfig::{UserSection, parse_user_section};
use crate::core::types::{ActiveConfig, ConfigSource};

/// Global config files in lookup order: `~/.gitconfig`, then the XDG location.
pub fn global_config_candidates(home: &Path, xdg_config_home: Option<&Path>) -> Vec<PathBuf> {
    let xdg = match xdg_config_home {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        _ => home.join(".config"),
    };
    vec![home.join(".gitconfig"), xdg.join("git").join("config")]
}

/// Read one config file. Missing files count as "no configuration here".
pub fn read_user_section(path: &Path) -> Result<Option<UserSection>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    let section =
        parse_user_section(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(section)
}

/// Resolve the active configuration: local first, then each global candidate.
pub fn load_active_config(
    local_config: &Path,
    global_candidates: &[PathBuf],
) -> Result<Option<ActiveConfig>> {
    if let Some(section) = read_user_section(local_config)? {
        debug!(path = %local_config.display(), "using local identity config");
        return Ok(Some(into_active(section, ConfigSource::Local)));
    }
    for path in global_candidates {
        if let Some(section) = read_user_section(path)? {
            debug!(path = %path.display(), "using global identity config");
            return Ok(Some(into_active(section, ConfigSource::Global)));
        }
    }
    debug!("no identity config found");
    Ok(None)
}

fn into_active(section: UserSection, source: ConfigSource) -> ActiveConfig {
    ActiveConfig {
        name: section.name,
        email: section.email,
        transport_command: section.ssh_command,
        source,
    }
}
