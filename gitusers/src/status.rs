//! Repository status aggregation for the prompt.
//!
//! Issues a fixed sequence of `git` queries and folds their outputs into one
//! [`StatusSnapshot`]. A failing query degrades its field to zero; only the
//! stash listing and the detached-HEAD hash lookup are required to succeed.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::core::status_parse::{
    Divergence, NameStatusCounts, branch_from_symbolic_ref, count_stashes_on, count_untracked,
    parse_left_right, parse_name_status, upstream_ref,
};
use crate::core::types::StatusSnapshot;
use crate::io::git::Git;
use crate::io::process::{CommandOutput, CommandRunner};

/// Substring of `git diff` stderr taken to mean the repository disappeared
/// (e.g. deleted while a shell was still inside it).
///
/// This matches free text, so any fatal diff error is treated the same way.
const REPOSITORY_GONE: &str = "fatal";

/// Result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    Snapshot(StatusSnapshot),
    /// `git diff` reported a fatal error; there is nothing to render.
    RepositoryGone,
}

/// Collect a status snapshot.
///
/// `detached_marker` prefixes the short hash when HEAD is detached; `today`
/// selects which stash entries count.
#[instrument(skip_all)]
pub fn aggregate_status<R: CommandRunner>(
    git: &Git<R>,
    detached_marker: &str,
    today: NaiveDate,
) -> Result<StatusOutcome> {
    let head = git.symbolic_head()?;
    let branch = if head.success() {
        branch_from_symbolic_ref(&head.stdout)
    } else {
        None
    };
    debug!(branch = ?branch, "resolved HEAD");

    let unstaged = git.diff_name_status(false)?;
    if unstaged.stderr.contains(REPOSITORY_GONE) {
        warn!(stderr = %unstaged.stderr.trim(), "diff failed fatally, skipping status");
        return Ok(StatusOutcome::RepositoryGone);
    }
    let unstaged = name_status_or_default(&unstaged);
    let staged = name_status_or_default(&git.diff_name_status(true)?);

    let porcelain = git.status_porcelain()?;
    let untracked = if porcelain.success() {
        count_untracked(&porcelain.stdout)
    } else {
        0
    };

    let stashes_today = count_stashes_on(&git.stash_list()?, today);

    let (branch_or_hash, divergence) = match branch {
        Some(branch) => {
            let divergence = divergence(git, &branch)?;
            (branch, divergence)
        }
        None => (
            format!("{detached_marker}{}", git.short_head()?),
            Divergence::default(),
        ),
    };

    Ok(StatusOutcome::Snapshot(StatusSnapshot {
        branch_or_hash,
        ahead: divergence.ahead,
        behind: divergence.behind,
        staged: staged.resolved,
        changed: unstaged.resolved,
        conflicts: unstaged.unmerged,
        untracked,
        stashes_today,
    }))
}

fn name_status_or_default(out: &CommandOutput) -> NameStatusCounts {
    if out.success() {
        parse_name_status(&out.stdout)
    } else {
        NameStatusCounts::default()
    }
}

/// Ahead/behind relative to the branch's configured upstream.
///
/// Compares against the remote-tracking ref first and retries with the raw
/// merge target; zero when no upstream is configured or both attempts fail.
fn divergence<R: CommandRunner>(git: &Git<R>, branch: &str) -> Result<Divergence> {
    let Some(remote) = git.config_get(&format!("branch.{branch}.remote"))? else {
        return Ok(Divergence::default());
    };
    let Some(merge) = git.config_get(&format!("branch.{branch}.merge"))? else {
        return Ok(Divergence::default());
    };

    let upstream = upstream_ref(&remote, &merge);
    let mut revs = git.rev_list_left_right(&upstream)?;
    if !revs.success() {
        debug!(upstream = %upstream, "rev-list failed, retrying with merge target");
        revs = git.rev_list_left_right(&merge)?;
    }
    if !revs.success() {
        return Ok(Divergence::default());
    }
    Ok(parse_left_right(&revs.stdout))
}
