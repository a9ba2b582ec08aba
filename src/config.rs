//! Configuration handling for papi
//!
//! Configuration is stored in `.papi/config.toml` (project) and
//! `~/.config/papi/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugin::DEFAULT_HOST_MODULE;

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".papi";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Expansion loading settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionsConfig {
    /// Directory of expansion binaries, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Load the expansion directory on startup
    pub autoload: bool,

    /// Register the built-in `core` expansions
    pub builtins: bool,

    /// Name of the hosting module, never imported as an expansion source
    pub host_module: String,
}

impl Default for ExpansionsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            autoload: true,
            builtins: true,
            host_module: DEFAULT_HOST_MODULE.to_string(),
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    /// Expansion settings
    pub expansions: ExpansionsConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Log level used when neither `--verbose` nor `RUST_LOG` is set
    pub log_level: LogLevel,

    /// Expansion directory used outside of a project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion_dir: Option<PathBuf>,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Log verbosity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "papi", "papi").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        if config.expansions.host_module.is_empty() {
            return Err(ConfigError::Invalid("expansions.host_module must not be empty".into()).into());
        }

        Ok(config)
    }

    /// Finds the project root by looking for a `.papi/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Walks up from `start` looking for a `.papi/` directory
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Returns true if we're in a papi project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Resolves the expansion directory
    ///
    /// An explicit override wins, then the project setting (relative to the
    /// project root), then the global setting, then `.papi/expansions` in
    /// the current project.
    pub fn expansion_dir(&self, override_dir: Option<&Path>) -> Option<PathBuf> {
        if let Some(dir) = override_dir {
            return Some(dir.to_path_buf());
        }

        if let Some(dir) = &self.project.expansions.directory {
            return Some(match &self.project_root {
                Some(root) if dir.is_relative() => root.join(dir),
                _ => dir.clone(),
            });
        }

        if let Some(dir) = &self.global.expansion_dir {
            return Some(dir.clone());
        }

        self.project_root
            .as_ref()
            .map(|root| root.join(PROJECT_DIR).join("expansions"))
    }

    /// Writes a default project configuration under `root`
    pub fn init_project(root: &Path) -> Result<PathBuf> {
        let papi_dir = root.join(PROJECT_DIR);
        let expansions_dir = papi_dir.join("expansions");

        fs::create_dir_all(&expansions_dir).with_context(|| {
            format!(
                "Failed to create expansions directory: {}",
                expansions_dir.display()
            )
        })?;

        let config_path = papi_dir.join("config.toml");
        if !config_path.exists() {
            let content = toml::to_string_pretty(&ProjectConfig::default())
                .context("Failed to serialize project config")?;
            fs::write(&config_path, content).with_context(|| {
                format!("Failed to write project config: {}", config_path.display())
            })?;
        }

        Ok(papi_dir)
    }
}
