//! Shared deterministic types for identity resolution and repository status.
//!
//! These types carry no I/O handles; they are recomputed on every invocation
//! and never persisted.

use serde::{Deserialize, Serialize};

/// A known identity from the registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique key within the registry (e.g. `work`).
    pub short: String,
    /// Author name written to `user.name`.
    pub name: String,
    /// Author email written to `user.email`.
    pub email: String,
    /// Private key used by the ssh transport. Missing and empty both mean "no key".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privkey: Option<String>,
}

impl Identity {
    /// Private key path, treating an empty string as absent.
    pub fn key_path(&self) -> Option<&str> {
        self.privkey.as_deref().filter(|key| !key.trim().is_empty())
    }
}

/// Where the active configuration was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Local,
    Global,
}

/// The name/email/transport triple currently in effect for a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConfig {
    pub name: String,
    pub email: String,
    /// Value of `core.sshCommand`, empty when unset.
    pub transport_command: String,
    pub source: ConfigSource,
}

/// Outcome of matching the active configuration against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// A repository exists but no `[user]` configuration is in effect.
    Empty,
    /// Active configuration matches the identity with this short name.
    Found(String),
    /// Active configuration matches no identity; holds the configured name.
    Unknown(String),
    /// The working directory is not inside a repository.
    NoRepository,
}

/// Aggregated repository status for one prompt rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Branch name, or detached marker followed by the short commit hash.
    pub branch_or_hash: String,
    pub ahead: u32,
    pub behind: u32,
    pub staged: u32,
    pub changed: u32,
    pub conflicts: u32,
    pub untracked: u32,
    /// Stash entries created on the current local calendar day.
    pub stashes_today: u32,
}
