//! Parser for the `[user]` section and `sshCommand` of a git config file.
//!
//! Only the subset of git's config syntax that `git config` itself writes for
//! these keys is understood; anything richer (includes, quoted values,
//! subsections) is out of scope.

use thiserror::Error;

/// Identity-related values extracted from one config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSection {
    pub name: String,
    pub email: String,
    /// `sshCommand` value found anywhere in the file, empty when unset.
    pub ssh_command: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigParseError {
    #[error("line {line_no}: expected `key = value`, got: {line}")]
    MissingEquals { line_no: usize, line: String },
    #[error("line {line_no}: unsupported user key `{key}` in: {line}")]
    UnsupportedKey {
        line_no: usize,
        key: String,
        line: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    OutsideSection,
    InUserSection,
    AfterUserSection,
}

const USER_HEADER: &str = "[user]";
const SSH_COMMAND_MARKER: &str = "sshCommand =";

/// Parse config text.
///
/// Returns `Ok(None)` when the file has no (or an empty) `[user]` section, so
/// the caller can fall back to another config location.
pub fn parse_user_section(contents: &str) -> Result<Option<UserSection>, ConfigParseError> {
    let mut state = State::OutsideSection;
    let mut section = UserSection::default();
    let mut user_entries = 0usize;

    for (idx, raw) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }
        if raw.contains(SSH_COMMAND_MARKER) {
            let (_, value) = split_assignment(raw, line_no)?;
            section.ssh_command = value.to_string();
            continue;
        }

        state = match state {
            State::OutsideSection if trimmed == USER_HEADER => State::InUserSection,
            State::OutsideSection => State::OutsideSection,
            State::InUserSection if trimmed.starts_with('[') => State::AfterUserSection,
            State::InUserSection => {
                let (key, value) = split_assignment(raw, line_no)?;
                match key {
                    "name" => section.name = value.to_string(),
                    "email" => section.email = value.to_string(),
                    other => {
                        return Err(ConfigParseError::UnsupportedKey {
                            line_no,
                            key: other.to_string(),
                            line: raw.to_string(),
                        });
                    }
                }
                user_entries += 1;
                State::InUserSection
            }
            State::AfterUserSection => State::AfterUserSection,
        };
    }

    if user_entries == 0 {
        return Ok(None);
    }
    Ok(Some(section))
}

/// Split on the first `=` only; values may contain `=` themselves.
fn split_assignment(line: &str, line_no: usize) -> Result<(&str, &str), ConfigParseError> {
    let (key, value) = line
        .split_once('=')
        .ok_or_else(|| ConfigParseError::MissingEquals {
            line_no,
            line: line.to_string(),
        })?;
    Ok((key.trim(), value.trim()))
}
