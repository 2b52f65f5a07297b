//! Prompt string formatting.

use serde::Deserialize;

use crate::core::types::{ResolutionStatus, StatusSnapshot};

/// Text shown when the repository has no identity configured.
pub const EMPTY_MARKER: &str = "NONE";

/// Glyphs and decorations used when rendering the prompt.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PromptStyle {
    /// Between identity marker and branch.
    pub separator: String,
    pub ahead: String,
    pub behind: String,
    pub stash: String,
    pub conflict: String,
    pub changed: String,
    pub untracked: String,
    /// Shown without a count when anything is staged.
    pub staged: String,
    /// Wraps `NONE` and unknown identity names (zsh color escapes by default).
    pub warn_prefix: String,
    pub warn_suffix: String,
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self {
            separator: "@".to_string(),
            ahead: "↑".to_string(),
            behind: "↓".to_string(),
            stash: "⚑".to_string(),
            conflict: "✖".to_string(),
            changed: "✚".to_string(),
            untracked: "…".to_string(),
            staged: "●".to_string(),
            warn_prefix: "%{$fg[red]%}".to_string(),
            warn_suffix: "%{$reset_color%}".to_string(),
        }
    }
}

/// Replace ASCII digits with their Unicode superscript forms.
pub fn digits_to_superscript(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}

/// Identity marker alone. `None` outside a repository.
pub fn render_identity(status: &ResolutionStatus, style: &PromptStyle) -> Option<String> {
    match status {
        ResolutionStatus::NoRepository => None,
        ResolutionStatus::Found(short) => Some(short.clone()),
        ResolutionStatus::Empty => Some(warn(EMPTY_MARKER, style)),
        ResolutionStatus::Unknown(name) => Some(warn(name, style)),
    }
}

/// Full prompt: `<identity><sep><branch><distance>[ <suffix>]`.
///
/// Returns `None` (suppress output) outside a repository. Without a snapshot
/// only the identity marker is rendered.
pub fn render_prompt(
    status: &ResolutionStatus,
    snapshot: Option<&StatusSnapshot>,
    style: &PromptStyle,
) -> Option<String> {
    let mut out = render_identity(status, style)?;
    let Some(snapshot) = snapshot else {
        return Some(out);
    };

    out.push_str(&style.separator);
    out.push_str(&snapshot.branch_or_hash);
    let distance = snapshot.ahead + snapshot.behind;
    if distance > 1 {
        out.push_str(&digits_to_superscript(&distance.to_string()));
    }

    let suffix = render_suffix(snapshot, style);
    if !suffix.is_empty() {
        out.push(' ');
        out.push_str(&suffix);
    }
    Some(out)
}

fn render_suffix(snapshot: &StatusSnapshot, style: &PromptStyle) -> String {
    let counted = [
        (&style.ahead, snapshot.ahead),
        (&style.behind, snapshot.behind),
        (&style.stash, snapshot.stashes_today),
        (&style.conflict, snapshot.conflicts),
        (&style.changed, snapshot.changed),
        (&style.untracked, snapshot.untracked),
    ];
    let mut suffix: String = counted
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(glyph, count)| format!("{glyph}{count}"))
        .collect();
    if snapshot.staged > 0 {
        suffix.push_str(&style.staged);
    }
    suffix
}

fn warn(text: &str, style: &PromptStyle) -> String {
    format!("{}{}{}", style.warn_prefix, text, style.warn_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_style() -> PromptStyle {
        PromptStyle {
            warn_prefix: "<".to_string(),
            warn_suffix: ">".to_string(),
            ..PromptStyle::default()
        }
    }

    fn snapshot(branch: &str) -> StatusSnapshot {
        StatusSnapshot {
            branch_or_hash: branch.to_string(),
            ..StatusSnapshot::default()
        }
    }

    #[test]
    fn superscript_digits_only() {
        assert_eq!(digits_to_superscript("42 commits"), "⁴² commits");
        assert_eq!(digits_to_superscript("0123456789"), "⁰¹²³⁴⁵⁶⁷⁸⁹");
        assert_eq!(digits_to_superscript(""), "");
    }

    #[test]
    fn no_repository_suppresses_output() {
        let out = render_prompt(
            &ResolutionStatus::NoRepository,
            Some(&snapshot("main")),
            &plain_style(),
        );
        assert_eq!(out, None);
    }

    #[test]
    fn identity_markers() {
        let style = plain_style();
        assert_eq!(
            render_identity(&ResolutionStatus::Found("work".to_string()), &style),
            Some("work".to_string())
        );
        assert_eq!(
            render_identity(&ResolutionStatus::Empty, &style),
            Some("<NONE>".to_string())
        );
        assert_eq!(
            render_identity(&ResolutionStatus::Unknown("Jane".to_string()), &style),
            Some("<Jane>".to_string())
        );
    }

    #[test]
    fn clean_branch_has_no_suffix() {
        let out = render_prompt(
            &ResolutionStatus::Found("work".to_string()),
            Some(&snapshot("main")),
            &plain_style(),
        );
        assert_eq!(out.as_deref(), Some("work@main"));
    }

    #[test]
    fn single_commit_distance_is_not_superscripted() {
        let mut snap = snapshot("main");
        snap.ahead = 1;
        let out = render_prompt(
            &ResolutionStatus::Found("work".to_string()),
            Some(&snap),
            &plain_style(),
        );
        assert_eq!(out.as_deref(), Some("work@main ↑1"));
    }

    #[test]
    fn full_suffix_in_fixed_order() {
        let snap = StatusSnapshot {
            branch_or_hash: "main".to_string(),
            ahead: 2,
            behind: 10,
            staged: 3,
            changed: 4,
            conflicts: 1,
            untracked: 5,
            stashes_today: 1,
        };
        let out = render_prompt(
            &ResolutionStatus::Found("work".to_string()),
            Some(&snap),
            &plain_style(),
        );
        assert_eq!(out.as_deref(), Some("work@main¹² ↑2↓10⚑1✖1✚4…5●"));
    }

    #[test]
    fn identity_only_without_snapshot() {
        let out = render_prompt(&ResolutionStatus::Empty, None, &plain_style());
        assert_eq!(out.as_deref(), Some("<NONE>"));
    }
}
