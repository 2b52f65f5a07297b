//! CLI settings stored under `~/.config/gitusers.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::render::PromptStyle;
use crate::io::registry::default_registry_path;

pub const SETTINGS_FILE: &str = "gitusers.toml";

/// Environment variable overriding the registry location.
pub const REGISTRY_ENV: &str = "GITUSERS_REGISTRY";

/// User settings (TOML).
///
/// Every field is optional in the file; missing fields take the defaults
/// below.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Registry file; defaults to `~/.config/gitusers.json`.
    pub registry_path: Option<PathBuf>,

    /// Editor for `-e`; falls back to `$VISUAL`, `$EDITOR`, then `vi`.
    pub editor: Option<String>,

    /// Prefix shown before the short hash on a detached HEAD.
    pub detached_marker: String,

    pub prompt: PromptStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_path: None,
            editor: None,
            detached_marker: ":".to_string(),
            prompt: PromptStyle::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.detached_marker.is_empty() {
            return Err(anyhow!("detached_marker must not be empty"));
        }
        if self
            .registry_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(anyhow!("registry_path must not be empty when set"));
        }
        if self
            .editor
            .as_ref()
            .is_some_and(|editor| editor.trim().is_empty())
        {
            return Err(anyhow!("editor must not be empty when set"));
        }
        Ok(())
    }

    /// Registry location: `env_override`, then `registry_path`, then the default.
    /// Relative paths are taken relative to `home`.
    pub fn registry_path(&self, home: &Path, env_override: Option<PathBuf>) -> PathBuf {
        match env_override.or_else(|| self.registry_path.clone()) {
            Some(path) if path.is_relative() => home.join(path),
            Some(path) => path,
            None => default_registry_path(home),
        }
    }
}

/// Default settings location under `home`.
pub fn default_settings_path(home: &Path) -> PathBuf {
    home.join(".config").join(SETTINGS_FILE)
}

/// Load settings from a TOML file.
///
/// If the file is missing, returns `Settings::default()`.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = load_settings(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("gitusers.toml");
        fs::write(
            &path,
            "detached_marker = \"➦\"\n\n[prompt]\nseparator = \" \"\n",
        )
        .expect("write");
        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.detached_marker, "➦");
        assert_eq!(settings.prompt.separator, " ");
        assert_eq!(settings.prompt.staged, PromptStyle::default().staged);
    }

    #[test]
    fn full_prompt_table_is_read() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("gitusers.toml");
        fs::write(
            &path,
            "editor = \"nano\"\n\n[prompt]\nseparator = \":\"\nahead = \"+\"\nbehind = \"-\"\n\
             stash = \"s\"\nconflict = \"x\"\nchanged = \"c\"\nuntracked = \"u\"\n\
             staged = \"*\"\nwarn_prefix = \"\"\nwarn_suffix = \"\"\n",
        )
        .expect("write");
        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.editor.as_deref(), Some("nano"));
        assert_eq!(
            settings.prompt,
            PromptStyle {
                separator: ":".to_string(),
                ahead: "+".to_string(),
                behind: "-".to_string(),
                stash: "s".to_string(),
                conflict: "x".to_string(),
                changed: "c".to_string(),
                untracked: "u".to_string(),
                staged: "*".to_string(),
                warn_prefix: String::new(),
                warn_suffix: String::new(),
            }
        );
    }

    #[test]
    fn empty_marker_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("gitusers.toml");
        fs::write(&path, "detached_marker = \"\"\n").expect("write");
        assert!(load_settings(&path).is_err());
    }

    #[test]
    fn registry_path_precedence() {
        let home = Path::new("/home/me");
        let mut settings = Settings::default();
        assert_eq!(
            settings.registry_path(home, None),
            PathBuf::from("/home/me/.config/gitusers.json")
        );
        settings.registry_path = Some(PathBuf::from("ids.json"));
        assert_eq!(
            settings.registry_path(home, None),
            PathBuf::from("/home/me/ids.json")
        );
        assert_eq!(
            settings.registry_path(home, Some(PathBuf::from("/etc/ids.json"))),
            PathBuf::from("/etc/ids.json")
        );
    }
}
