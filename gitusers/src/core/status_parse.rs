//! Parsers for the line-oriented `git` outputs used by the status aggregator.
//!
//! Each parser takes the raw stdout of one query and is total: unexpected
//! lines are skipped rather than reported, so a format change degrades counts
//! instead of failing the prompt.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Prefix of local branch refs as printed by `git symbolic-ref HEAD`.
pub const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Change code marking an unmerged (conflicted) path in `--name-status` output.
const UNMERGED_CODE: char = 'U';

/// Counts derived from `git diff [--staged] --name-status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameStatusCounts {
    /// Entries whose change code is not `U`.
    pub resolved: u32,
    /// Entries whose change code is `U`.
    pub unmerged: u32,
}

/// Strip `refs/heads/` from a symbolic ref. Returns `None` for anything else
/// (e.g. a ref outside the local branch namespace).
pub fn branch_from_symbolic_ref(raw: &str) -> Option<String> {
    let name = raw.trim().strip_prefix(LOCAL_BRANCH_PREFIX)?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Tally `--name-status` lines by their one-letter change code.
pub fn parse_name_status(raw: &str) -> NameStatusCounts {
    raw.lines()
        .filter_map(|line| line.chars().next())
        .fold(NameStatusCounts::default(), |mut counts, code| {
            if code == UNMERGED_CODE {
                counts.unmerged += 1;
            } else {
                counts.resolved += 1;
            }
            counts
        })
}

/// Count untracked entries (`??`) in `git status --porcelain` output.
pub fn count_untracked(raw: &str) -> u32 {
    raw.lines().filter(|line| line.starts_with("??")).count() as u32
}

/// `git stash list --date=iso` lines look like
/// `stash@{2021-05-28 12:02:24 +0200}: WIP on master: 153225e msg`.
/// The date is the first field inside the braces.
static STASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^stash@\{(?P<date>\d{4}-\d{2}-\d{2})[ }]").expect("static stash regex")
});

/// Date component of one stash list line, if it has the iso layout.
pub fn stash_date(line: &str) -> Option<NaiveDate> {
    let caps = STASH_DATE.captures(line)?;
    NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").ok()
}

/// Count stash entries created on `today`.
pub fn count_stashes_on(raw: &str, today: NaiveDate) -> u32 {
    raw.lines()
        .filter_map(stash_date)
        .filter(|date| *date == today)
        .count() as u32
}

/// Ahead/behind tally from `git rev-list --left-right <upstream>...HEAD`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Divergence {
    pub ahead: u32,
    pub behind: u32,
}

/// Lines marked `>` are reachable only from `HEAD` (ahead); any other
/// non-empty line is reachable only from the upstream (behind).
pub fn parse_left_right(raw: &str) -> Divergence {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .fold(Divergence::default(), |mut div, line| {
            if line.starts_with('>') {
                div.ahead += 1;
            } else {
                div.behind += 1;
            }
            div
        })
}

/// Upstream ref to compare against for `branch.<b>.remote` / `branch.<b>.merge`.
///
/// Remote `.` means the branch tracks another local branch, so the merge
/// target is used as-is.
pub fn upstream_ref(remote: &str, merge: &str) -> String {
    if remote == "." {
        return merge.to_string();
    }
    let branch = merge.strip_prefix(LOCAL_BRANCH_PREFIX).unwrap_or(merge);
    format!("refs/remotes/{remote}/{branch}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn branch_strips_local_prefix() {
        assert_eq!(
            branch_from_symbolic_ref("refs/heads/feature/x\n"),
            Some("feature/x".to_string())
        );
    }

    #[test]
    fn branch_rejects_foreign_refs() {
        assert_eq!(branch_from_symbolic_ref("refs/remotes/origin/main\n"), None);
        assert_eq!(branch_from_symbolic_ref(""), None);
    }

    #[test]
    fn name_status_separates_unmerged() {
        let counts = parse_name_status("M\ta.rs\nU\tb.rs\nD\tc.rs\n\nU\td.rs\n");
        assert_eq!(
            counts,
            NameStatusCounts {
                resolved: 2,
                unmerged: 2
            }
        );
    }

    #[test]
    fn name_status_empty_output_is_zero() {
        assert_eq!(parse_name_status(""), NameStatusCounts::default());
    }

    #[test]
    fn untracked_counts_only_question_marks() {
        let raw = "?? new.txt\n M changed.rs\nA  added.rs\n?? other/\n";
        assert_eq!(count_untracked(raw), 2);
    }

    #[test]
    fn stash_count_filters_by_today() {
        let raw = "stash@{2021-05-28 12:02:24 +0200}: WIP on master: 153225e add README\n\
                   stash@{2021-05-27 09:00:00 +0200}: WIP on master: 0a1b2c3 older\n";
        assert_eq!(count_stashes_on(raw, date("2021-05-28")), 1);
    }

    #[test]
    fn stash_lines_without_iso_date_are_skipped() {
        let raw = "stash@{0}: WIP on master: 153225e add README\n";
        assert_eq!(count_stashes_on(raw, date("2021-05-28")), 0);
        assert_eq!(stash_date("garbage"), None);
    }

    #[test]
    fn left_right_tally() {
        assert_eq!(
            parse_left_right(">abc\n<def\n>ghi"),
            Divergence {
                ahead: 2,
                behind: 1
            }
        );
    }

    #[test]
    fn left_right_ignores_blank_lines() {
        assert_eq!(parse_left_right("\n\n"), Divergence::default());
    }

    #[test]
    fn upstream_ref_for_remote_branch() {
        assert_eq!(
            upstream_ref("origin", "refs/heads/main"),
            "refs/remotes/origin/main"
        );
    }

    #[test]
    fn upstream_ref_for_local_tracking_uses_merge() {
        assert_eq!(upstream_ref(".", "refs/heads/base"), "refs/heads/base");
    }
}
