//! Prompt assembly: identity resolution plus repository status.

use anyhow::Result;
use chrono::NaiveDate;

use crate::core::render::render_prompt;
use crate::core::types::ResolutionStatus;
use crate::io::git::Git;
use crate::io::process::CommandRunner;
use crate::io::settings::Settings;
use crate::status::{StatusOutcome, aggregate_status};

/// Build the prompt string, or `None` when nothing should be printed
/// (outside a repository, or the repository vanished mid-query).
pub fn build_prompt<R: CommandRunner>(
    status: &ResolutionStatus,
    git: &Git<R>,
    settings: &Settings,
    today: NaiveDate,
) -> Result<Option<String>> {
    if *status == ResolutionStatus::NoRepository {
        return Ok(None);
    }
    match aggregate_status(git, &settings.detached_marker, today)? {
        StatusOutcome::Snapshot(snapshot) => {
            Ok(render_prompt(status, Some(&snapshot), &settings.prompt))
        }
        StatusOutcome::RepositoryGone => Ok(None),
    }
}
