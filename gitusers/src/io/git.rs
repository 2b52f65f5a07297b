//! Git adapter: one method per `git` invocation the CLI issues.
//!
//! Methods return raw outputs where the caller decides how a failure degrades,
//! and checked values where a failure means the environment is broken.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::io::process::{CommandOutput, CommandRunner};

pub const GIT: &str = "git";

/// Wrapper for executing git commands through a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct Git<R> {
    runner: R,
}

impl<R: CommandRunner> Git<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// `git symbolic-ref HEAD`; fails on detached HEAD.
    pub fn symbolic_head(&self) -> Result<CommandOutput> {
        self.run(&["symbolic-ref", "HEAD"])
    }

    /// `git diff [--staged] --name-status`.
    pub fn diff_name_status(&self, staged: bool) -> Result<CommandOutput> {
        if staged {
            self.run(&["diff", "--staged", "--name-status"])
        } else {
            self.run(&["diff", "--name-status"])
        }
    }

    pub fn status_porcelain(&self) -> Result<CommandOutput> {
        self.run(&["status", "--porcelain"])
    }

    /// `git stash list --date=iso`. Must succeed inside a repository.
    pub fn stash_list(&self) -> Result<String> {
        let out = self
            .runner
            .execute_or_fail(GIT, &["stash", "list", "--date=iso"], &[])?;
        Ok(out.stdout)
    }

    /// `git rev-parse --short HEAD`, trimmed. Must succeed inside a repository.
    pub fn short_head(&self) -> Result<String> {
        let out = self
            .runner
            .execute_or_fail(GIT, &["rev-parse", "--short", "HEAD"], &[])?;
        Ok(out.stdout.trim().to_string())
    }

    /// `git rev-list --left-right <upstream>...HEAD`.
    pub fn rev_list_left_right(&self, upstream: &str) -> Result<CommandOutput> {
        let range = format!("{upstream}...HEAD");
        self.run(&["rev-list", "--left-right", &range])
    }

    /// Read a config value. `None` when unset (nonzero exit) or empty.
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        let out = self.run(&["config", key])?;
        let value = out.stdout.trim();
        if !out.success() || value.is_empty() {
            return Ok(None);
        }
        Ok(Some(value.to_string()))
    }

    /// Write a config value into the repository's local config.
    #[instrument(skip_all, fields(key = %key))]
    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        debug!("setting git config");
        self.runner
            .execute_or_fail(GIT, &["config", key, value], &[])
            .with_context(|| format!("set {key}"))?;
        Ok(())
    }

    /// `git clone <args...>` with extra environment.
    #[instrument(skip_all)]
    pub fn clone_repo(&self, args: &[&str], env: &[(&str, &str)]) -> Result<()> {
        let mut full = vec!["clone"];
        full.extend_from_slice(args);
        debug!(args = ?full, "cloning");
        self.runner
            .execute_or_fail(GIT, &full, env)
            .context("git clone")?;
        Ok(())
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner.execute(GIT, args, &[])
    }
}
