//! Identity registry stored as JSON (default `~/.config/gitusers.json`).
//!
//! ```json
//! [
//!   { "short": "work", "name": "Jane Doe", "email": "jane@corp.example", "privkey": "/home/jane/.ssh/id_work" },
//!   { "short": "home", "name": "Jane", "email": "jane@home.example" }
//! ]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::types::Identity;

/// File name of the registry under the user's config directory.
pub const REGISTRY_FILE: &str = "gitusers.json";

/// Loaded registry: identities sorted by short name, plus the file they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    pub identities: Vec<Identity>,
    pub path: PathBuf,
}

impl Registry {
    /// Find an identity by short name, display name or email (first match in order).
    pub fn lookup(&self, token: &str) -> Option<&Identity> {
        self.identities
            .iter()
            .find(|id| id.short == token || id.name == token || id.email == token)
    }

    /// Comma-separated short names, for error messages.
    pub fn short_names(&self) -> String {
        self.identities
            .iter()
            .map(|id| id.short.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Default registry location under `home`.
pub fn default_registry_path(home: &Path) -> PathBuf {
    home.join(".config").join(REGISTRY_FILE)
}

/// Load and validate the registry at `path`.
pub fn load_registry(path: &Path) -> Result<Registry> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read registry {}", path.display()))?;
    let identities = parse_registry(&contents)
        .with_context(|| format!("parse registry {}", path.display()))?;
    debug!(path = %path.display(), count = identities.len(), "loaded registry");
    Ok(Registry {
        identities,
        path: path.to_path_buf(),
    })
}

/// Parse registry JSON, sort by short name and reject duplicate short names.
pub fn parse_registry(contents: &str) -> Result<Vec<Identity>> {
    let mut identities: Vec<Identity> = serde_json::from_str(contents).context("parse json")?;
    identities.sort_by(|a, b| a.short.cmp(&b.short));

    let mut seen = HashSet::new();
    for id in &identities {
        if id.short.trim().is_empty() {
            bail!("identity with empty short name ({})", id.email);
        }
        if !seen.insert(id.short.as_str()) {
            bail!("duplicate identity short name: {}", id.short);
        }
    }
    Ok(identities)
}
