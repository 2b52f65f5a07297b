//! Per-invocation state: where things live and what is currently configured.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::resolver::resolve;
use crate::core::types::{ActiveConfig, ResolutionStatus};
use crate::io::gitconfig::{global_config_candidates, load_active_config};
use crate::io::locator::{Repository, find_repository};
use crate::io::registry::{Registry, load_registry};
use crate::io::settings::{REGISTRY_ENV, Settings, default_settings_path, load_settings};

const CEILING_ENV: &str = "GIT_CEILING_DIRECTORIES";

/// Resolved input locations for one invocation.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    pub home: PathBuf,
    pub cwd: PathBuf,
    pub xdg_config_home: Option<PathBuf>,
    pub registry_override: Option<PathBuf>,
    /// Absolute directories from `GIT_CEILING_DIRECTORIES`.
    pub ceiling_dirs: Vec<PathBuf>,
}

impl SessionPaths {
    /// Read locations from the process environment.
    pub fn from_env() -> Result<Self> {
        let home = home::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        let cwd = std::env::current_dir().context("read current directory")?;
        Ok(Self {
            home,
            cwd,
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            registry_override: std::env::var_os(REGISTRY_ENV).map(PathBuf::from),
            ceiling_dirs: std::env::var_os(CEILING_ENV)
                .map(|value| {
                    std::env::split_paths(&value)
                        .filter(|dir| dir.is_absolute())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

/// Settings, repository and active configuration for the working directory.
///
/// The registry is loaded on demand so that commands which never consult it
/// (prompt outside a repository, editing a missing registry) do not need it.
#[derive(Debug, Clone)]
pub struct Session {
    pub cwd: PathBuf,
    pub settings: Settings,
    pub registry_path: PathBuf,
    pub repository: Option<Repository>,
    pub active: Option<ActiveConfig>,
}

impl Session {
    pub fn load(paths: &SessionPaths) -> Result<Self> {
        let settings = load_settings(&default_settings_path(&paths.home))?;
        let registry_path = settings.registry_path(&paths.home, paths.registry_override.clone());
        let repository = find_repository(&paths.cwd, &paths.ceiling_dirs)?;
        let active = match &repository {
            Some(repo) => {
                let globals =
                    global_config_candidates(&paths.home, paths.xdg_config_home.as_deref());
                load_active_config(&repo.config_path(), &globals)?
            }
            None => None,
        };
        debug!(
            registry = %registry_path.display(),
            in_repository = repository.is_some(),
            configured = active.is_some(),
            "session loaded"
        );
        Ok(Self {
            cwd: paths.cwd.clone(),
            settings,
            registry_path,
            repository,
            active,
        })
    }

    pub fn registry(&self) -> Result<Registry> {
        load_registry(&self.registry_path)
    }

    /// Resolve the active configuration. Outside a repository the registry
    /// is not read at all.
    pub fn resolution(&self) -> Result<ResolutionStatus> {
        if self.repository.is_none() {
            return Ok(ResolutionStatus::NoRepository);
        }
        let registry = self.registry()?;
        Ok(resolve(true, self.active.as_ref(), &registry.identities))
    }

    pub fn require_repository(&self) -> Result<&Repository> {
        self.repository
            .as_ref()
            .ok_or_else(|| anyhow!("could not find .git in {}", self.cwd.display()))
    }
}
