//! Configuration management for hookcheck.
//!
//! Every key is optional. With no config file the hooks behave exactly
//! like the stock deployment and review scripts.
//!
//! Config names the binaries the hooks execute, so it is only read from
//! an explicit path or the user's home directory, never from the
//! working tree being checked.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub kubectl: KubectlConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub post_deploy: PostDeployConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct KubectlConfig {
    #[serde(default = "default_kubectl")]
    pub binary: String,

    /// Label selector for the readiness wait.
    #[serde(default = "default_selector")]
    pub selector: String,

    /// Passed to `kubectl wait --timeout`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: default_kubectl(),
            selector: default_selector(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GitConfig {
    #[serde(default = "default_git")]
    pub binary: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_git(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct PostDeployConfig {
    /// Shell lines run after the readiness wait. Empty keeps the no-op step.
    #[serde(default)]
    pub smoke_tests: Vec<String>,
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

fn default_selector() -> String {
    "app=myapp".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_git() -> String {
    "git".to_string()
}

impl Config {
    /// Load config from `explicit` if given (it must exist), else from
    /// `~/.hookcheck/config.toml`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Error> {
        Self::load_from(explicit, &Self::global_path())
    }

    fn load_from(explicit: Option<&Path>, global: &Path) -> Result<Self, Error> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        if global.exists() {
            return Self::from_file(global);
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        debug!(path = %path.display(), "Loading config");
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path to global hookcheck directory (~/.hookcheck/)
    pub fn global_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hookcheck")
    }

    /// Path to global config file
    pub fn global_path() -> PathBuf {
        Self::global_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_stock_scripts() {
        let config = Config::default();
        assert_eq!(config.kubectl.binary, "kubectl");
        assert_eq!(config.kubectl.selector, "app=myapp");
        assert_eq!(config.kubectl.timeout_secs, 300);
        assert_eq!(config.git.binary, "git");
        assert!(config.post_deploy.smoke_tests.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[kubectl]\ntimeout_secs = 60\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.kubectl.timeout_secs, 60);
        assert_eq!(config.kubectl.selector, "app=myapp");
        assert_eq!(config.git, GitConfig::default());
    }

    #[test]
    fn test_full_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[kubectl]
binary = "/usr/local/bin/kubectl"
selector = "app=web,tier=frontend"

[git]
binary = "/usr/bin/git"

[post_deploy]
smoke_tests = ["curl -fsS http://localhost:8080/health"]
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.kubectl.binary, "/usr/local/bin/kubectl");
        assert_eq!(config.kubectl.selector, "app=web,tier=frontend");
        assert_eq!(config.git.binary, "/usr/bin/git");
        assert_eq!(config.post_deploy.smoke_tests.len(), 1);
    }

    #[test]
    fn test_missing_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.toml");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(p) if p == path));
    }

    #[test]
    fn test_explicit_path_wins_over_global() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("explicit.toml");
        let global = temp.path().join("global.toml");
        std::fs::write(&explicit, "[git]\nbinary = \"explicit-git\"\n").unwrap();
        std::fs::write(&global, "[git]\nbinary = \"global-git\"\n").unwrap();

        let config = Config::load_from(Some(&explicit), &global).unwrap();
        assert_eq!(config.git.binary, "explicit-git");

        let config = Config::load_from(None, &global).unwrap();
        assert_eq!(config.git.binary, "global-git");
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("config.toml");

        let config = Config::load_from(None, &global).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_global_path_is_under_home() {
        assert!(Config::global_path().ends_with(".hookcheck/config.toml"));
    }

    #[test]
    fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[kubectl\ntimeout_secs = 60").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[kubectl]\ntimeout_secs = \"soon\"\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }
}
