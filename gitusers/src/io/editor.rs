//! Launching the user's editor on the registry file.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;
use which::which;

const FALLBACK_EDITOR: &str = "vi";

/// Pick the editor command: settings, then `$VISUAL`, then `$EDITOR`, then `vi`.
pub fn choose_editor(
    configured: Option<&str>,
    visual: Option<&str>,
    editor: Option<&str>,
) -> String {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|cmd| !cmd.is_empty())
        .unwrap_or(FALLBACK_EDITOR)
        .to_string()
}

/// Run `editor` (which may carry arguments, e.g. `code -w`) on `path`,
/// attached to the current terminal, and wait for it to exit.
pub fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let mut words = editor.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| anyhow!("editor command is empty"))?;
    let resolved = which(program).with_context(|| format!("editor `{program}` not found"))?;
    debug!(editor = %resolved.display(), path = %path.display(), "opening editor");

    let status = Command::new(resolved)
        .args(words)
        .arg(path)
        .status()
        .with_context(|| format!("run {editor}"))?;
    if !status.success() {
        bail!("{editor} exited with status {:?}", status.code());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_editor_wins() {
        assert_eq!(choose_editor(Some("hx"), Some("code"), Some("nano")), "hx");
    }

    #[test]
    fn falls_through_blank_values() {
        assert_eq!(choose_editor(None, Some("  "), Some("nano")), "nano");
        assert_eq!(choose_editor(None, None, None), "vi");
    }

    #[test]
    fn missing_editor_is_error() {
        let err = open_in_editor("gitusers-no-such-editor", Path::new("/tmp/x.json"))
            .expect_err("missing");
        assert!(format!("{err:#}").contains("not found"));
    }
}
