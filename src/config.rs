use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::devbox::FALLBACK_SHELL;
use crate::filesystem::expand_tilde;
use crate::state::DEFAULT_STATE_FILE;

/// Container engine used for local devboxes
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    /// Docker (default)
    #[default]
    Docker,
    /// Podman
    Podman,
}

impl ContainerRuntime {
    pub fn program(&self) -> &'static str {
        match self {
            ContainerRuntime::Docker => "docker",
            ContainerRuntime::Podman => "podman",
        }
    }
}

/// User configuration, read from ~/.config/devbox/config.yaml
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    /// Path of the state file. Default: ~/.devbox.state.yaml
    #[serde(default)]
    pub state_file: Option<String>,

    /// Container engine for local devboxes. Default: docker
    #[serde(default)]
    pub runtime: Option<ContainerRuntime>,

    /// Image used by `devbox add` when --image is not given
    #[serde(default)]
    pub image: Option<String>,

    /// Shell recorded by `devbox add` when --shell is not given. Default: sh
    #[serde(default)]
    pub shell: Option<String>,

    /// Sandbox user recorded by `devbox add` when --user is not given
    #[serde(default)]
    pub user: Option<String>,
}

impl Config {
    /// Load the user configuration, or defaults when none exists.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(home_dir) = home::home_dir() {
            let dir = home_dir.join(".config/devbox");
            for name in ["config.yaml", "config.yml"] {
                if let Some(config) = Self::load_from_path(&dir.join(name))? {
                    return Ok(config);
                }
            }
        }
        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        debug!(path = %path.display(), "config:reading file");
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Some(Self::default()));
        }
        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config at {}: {}", path.display(), e))?;
        Ok(Some(config))
    }
}

/// Values `devbox add` falls back to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DevboxDefaults {
    pub image: Option<String>,
    pub shell: String,
    pub user: Option<String>,
}

/// Everything a command needs to know about how it was invoked.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub state_file: PathBuf,
    /// Print backend commands instead of running them.
    pub dry_run: bool,
    /// Print backend commands before running them.
    pub verbose: bool,
    pub runtime: ContainerRuntime,
    pub defaults: DevboxDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            dry_run: false,
            verbose: false,
            runtime: ContainerRuntime::default(),
            defaults: DevboxDefaults {
                image: None,
                shell: FALLBACK_SHELL.to_string(),
                user: None,
            },
        }
    }
}

impl Settings {
    /// Combine CLI flags with the user configuration. Flags win.
    pub fn resolve(
        config: Config,
        state_flag: Option<&str>,
        dry_run: bool,
        verbose: bool,
    ) -> anyhow::Result<Self> {
        let state_file = state_flag
            .map(str::to_string)
            .or(config.state_file)
            .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());

        let settings = Self {
            state_file: expand_tilde(&state_file)?,
            dry_run,
            verbose,
            runtime: config.runtime.unwrap_or_default(),
            defaults: DevboxDefaults {
                image: config.image.filter(|s| !s.is_empty()),
                shell: config
                    .shell
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| FALLBACK_SHELL.to_string()),
                user: config.user.filter(|s| !s.is_empty()),
            },
        };
        debug!(
            state_file = %settings.state_file.display(),
            runtime = settings.runtime.program(),
            dry_run,
            verbose,
            "config:resolved settings"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_from_missing_path_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(
            Config::load_from_path(&temp.path().join("config.yaml"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn load_from_path_parses_all_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "state_file: /tmp/boxes.yaml\nruntime: podman\nimage: ghcr.io/me/dev\nshell: zsh\nuser: me\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.state_file.as_deref(), Some("/tmp/boxes.yaml"));
        assert_eq!(config.runtime, Some(ContainerRuntime::Podman));
        assert_eq!(config.image.as_deref(), Some("ghcr.io/me/dev"));
        assert_eq!(config.shell.as_deref(), Some("zsh"));
        assert_eq!(config.user.as_deref(), Some("me"));
    }

    #[test]
    fn load_from_path_reports_bad_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "runtime: [docker\n").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn flags_override_config() {
        let config = Config {
            state_file: Some("/from/config.yaml".to_string()),
            runtime: Some(ContainerRuntime::Podman),
            ..Config::default()
        };
        let settings = Settings::resolve(config, Some("/from/flag.yaml"), true, false).unwrap();
        assert_eq!(settings.state_file, PathBuf::from("/from/flag.yaml"));
        assert_eq!(settings.runtime.program(), "podman");
        assert!(settings.dry_run);
    }

    #[test]
    fn config_fills_defaults() {
        let config = Config {
            state_file: Some("/from/config.yaml".to_string()),
            shell: Some(String::new()),
            image: Some("img".to_string()),
            ..Config::default()
        };
        let settings = Settings::resolve(config, None, false, true).unwrap();
        assert_eq!(settings.state_file, PathBuf::from("/from/config.yaml"));
        assert_eq!(settings.runtime, ContainerRuntime::Docker);
        assert_eq!(settings.defaults.shell, "sh");
        assert_eq!(settings.defaults.image.as_deref(), Some("img"));
        assert_eq!(settings.defaults.user, None);
    }
}
