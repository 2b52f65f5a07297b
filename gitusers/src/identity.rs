//! Identity commands: list, switch, and clone with an identity's key.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, info, instrument};
use which::which;

use crate::core::resolver::expected_transport_command;
use crate::core::types::Identity;
use crate::io::git::Git;
use crate::io::process::CommandRunner;

/// ssh wrapper that reads the key path from `SSH_IDENTITY_FILE`. `git clone`
/// cannot use `core.sshCommand` yet because the repository does not exist.
pub const SSH_WRAPPER: &str = "ssh-i-from-env";

pub const SSH_WRAPPER_INSTRUCTION: &str = "the wrapper 'ssh-i-from-env' is missing!

create it according to the following template and add it to your PATH:

#!/bin/bash
ssh -i \"$SSH_IDENTITY_FILE\" $*
";

/// One line per identity; the active one is marked with `*`.
pub fn format_identity_list(identities: &[Identity], active_short: Option<&str>) -> String {
    let width = identities
        .iter()
        .map(|id| id.short.chars().count())
        .max()
        .unwrap_or(0);
    identities
        .iter()
        .map(|id| {
            let mark = if Some(id.short.as_str()) == active_short {
                '*'
            } else {
                ' '
            };
            let key = id
                .key_path()
                .map(|key| format!("  [{key}]"))
                .unwrap_or_default();
            format!(
                "{mark} {:<width$}  {} <{}>{key}\n",
                id.short, id.name, id.email
            )
        })
        .collect()
}

/// Write name, email and transport command into the repository config.
#[instrument(skip_all, fields(identity = %identity.short))]
pub fn switch_identity<R: CommandRunner>(git: &Git<R>, identity: &Identity) -> Result<()> {
    git.config_set("user.name", &identity.name)?;
    git.config_set("user.email", &identity.email)?;
    git.config_set("core.sshCommand", &expected_transport_command(identity))?;
    info!("identity switched");
    Ok(())
}

/// Fail with setup instructions unless the ssh wrapper is on `PATH`.
pub fn ensure_transport_wrapper() -> Result<()> {
    if which(SSH_WRAPPER).is_err() {
        bail!("{SSH_WRAPPER_INSTRUCTION}");
    }
    Ok(())
}

/// Clone with `identity`'s key.
///
/// `args` are passed to `git clone` verbatim (url first). Returns the
/// directory the clone landed in when it can be derived from `args`, so the
/// caller can switch the new repository to the same identity.
#[instrument(skip_all, fields(identity = %identity.short))]
pub fn clone_with_identity<R: CommandRunner>(
    git: &Git<R>,
    identity: &Identity,
    args: &[String],
    cwd: &Path,
) -> Result<Option<PathBuf>> {
    if args.is_empty() {
        bail!("clone needs a repository url");
    }
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    match identity.key_path() {
        Some(key) => {
            ensure_transport_wrapper()?;
            git.clone_repo(
                &arg_refs,
                &[("GIT_SSH", SSH_WRAPPER), ("SSH_IDENTITY_FILE", key)],
            )?;
        }
        None => git.clone_repo(&arg_refs, &[])?,
    }
    let dest = clone_destination(args).map(|dest| cwd.join(dest));
    debug!(dest = ?dest, "clone finished");
    Ok(dest)
}

/// Destination of `git clone <url> [dir]` when no options are involved.
pub fn clone_destination(args: &[String]) -> Option<PathBuf> {
    if args.iter().any(|arg| arg.starts_with('-')) {
        return None;
    }
    match args {
        [_, dir] => Some(PathBuf::from(dir)),
        [url] => humanish_name(url).map(PathBuf::from),
        _ => None,
    }
}

/// Directory name git derives from a url: last path segment without `.git`.
fn humanish_name(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/.git").unwrap_or(trimmed);
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}
