//! Matching of the active configuration against the identity registry.

use crate::core::types::{ActiveConfig, Identity, ResolutionStatus};

/// Transport used when an identity has no private key.
pub const DEFAULT_TRANSPORT: &str = "ssh";

/// The `core.sshCommand` value an identity is expected to have configured.
///
/// With a key: `ssh -i <key> -o IdentitiesOnly=yes`, so the agent cannot offer
/// other keys first. Without a key: plain `ssh`.
pub fn expected_transport_command(identity: &Identity) -> String {
    match identity.key_path() {
        Some(key) => format!("{DEFAULT_TRANSPORT} -i {key} -o IdentitiesOnly=yes"),
        None => DEFAULT_TRANSPORT.to_string(),
    }
}

/// True when name, email and transport command all match.
pub fn matches(identity: &Identity, active: &ActiveConfig) -> bool {
    identity.name == active.name
        && identity.email == active.email
        && expected_transport_command(identity) == active.transport_command
}

/// Resolve the active configuration to a [`ResolutionStatus`].
///
/// The registry is scanned in order; the first full match wins.
pub fn resolve(
    repository_found: bool,
    active: Option<&ActiveConfig>,
    registry: &[Identity],
) -> ResolutionStatus {
    if !repository_found {
        return ResolutionStatus::NoRepository;
    }
    let Some(active) = active else {
        return ResolutionStatus::Empty;
    };
    registry
        .iter()
        .find(|identity| matches(identity, active))
        .map(|identity| ResolutionStatus::Found(identity.short.clone()))
        .unwrap_or_else(|| ResolutionStatus::Unknown(active.name.clone()))
}
