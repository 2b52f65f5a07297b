//! Test-only helpers: identity builders, a scripted command runner and
//! temporary home/repository fixtures.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::core::types::Identity;
use crate::io::process::{CommandOutput, CommandRunner};

/// Create a deterministic identity: name `<short> name`, email `<short>@example.com`.
pub fn identity(short: &str, privkey: Option<&str>) -> Identity {
    Identity {
        short: short.to_string(),
        name: format!("{short} name"),
        email: format!("{short}@example.com"),
        privkey: privkey.map(str::to_string),
    }
}

/// One call observed by [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// Runner returning canned outputs keyed by the space-joined argument list.
///
/// Calls without a scripted response are errors, so tests fail loudly when
/// the code under test issues an unexpected command.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for `args` (e.g. `"diff --name-status"`).
    pub fn on(mut self, args: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.responses.insert(
            args.to_string(),
            CommandOutput {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Space-joined argument lists of every call, in order.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.args.join(" "))
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn execute(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(RecordedCall {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| anyhow!("unscripted command: {program} {key}"))
    }
}

/// Temporary directory laid out like a user's home, with helpers to place a
/// registry, settings and repositories inside it.
pub struct TestHome {
    temp: tempfile::TempDir,
}

impl TestHome {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: tempfile::tempdir().context("tempdir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `~/.config/gitusers.json` from identities.
    pub fn write_registry(&self, identities: &[Identity]) -> Result<PathBuf> {
        let path = self.path().join(".config").join("gitusers.json");
        write_file(&path, &serde_json::to_string_pretty(identities)?)?;
        Ok(path)
    }

    /// Write `~/.gitconfig`.
    pub fn write_global_config(&self, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(".gitconfig");
        write_file(&path, contents)?;
        Ok(path)
    }

    /// Create `<home>/<name>/.git/config` with `contents` and return the repo root.
    pub fn create_repo(&self, name: &str, config: &str) -> Result<PathBuf> {
        let root = self.path().join(name);
        write_file(&root.join(".git").join("config"), config)?;
        Ok(root)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}
