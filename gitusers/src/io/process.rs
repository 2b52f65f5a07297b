//! Child process execution with captured output.
//!
//! A nonzero exit status is ordinary data here; only failing to spawn the
//! program at all is an error. [`CommandRunner::execute_or_fail`] is the
//! variant for calls whose failure means the environment is broken.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::{debug, error, instrument, warn};

/// Exit code reported when the child was terminated by a signal.
pub const SIGNALLED: i32 = -1;

/// Captured child process output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Abstraction over process execution. Tests use scripted runners that
/// return predetermined outputs without spawning processes.
pub trait CommandRunner {
    /// Run `program` with `args`. `env` entries are set on top of the
    /// inherited environment (never a full replacement).
    fn execute(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput>;

    /// Like [`execute`](Self::execute), but a nonzero exit is an error
    /// carrying the command line, exit code and stderr.
    fn execute_or_fail(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<CommandOutput> {
        let output = self.execute(program, args, env)?;
        if !output.success() {
            bail!(
                "{} {} failed with exit code {}: {}",
                program,
                args.join(" "),
                output.code,
                output.stderr.trim()
            );
        }
        Ok(output)
    }
}

/// Runner that spawns real processes in a fixed working directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    workdir: PathBuf,
}

impl SystemRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl CommandRunner for SystemRunner {
    #[instrument(skip_all, fields(program = %program, args = ?args))]
    fn execute(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null());
        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(e).with_context(|| format!("spawn {} {}", program, args.join(" ")));
            }
        };

        let code = match output.status.code() {
            Some(code) => code,
            None => {
                warn!("command terminated by signal");
                SIGNALLED
            }
        };
        debug!(exit_code = code, "command finished");
        Ok(CommandOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
