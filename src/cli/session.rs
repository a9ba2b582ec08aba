//! Registry setup shared by commands

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::placeholder::Registry;
use crate::plugin::{CoreModule, LoadReport, Loader};

/// Loading options taken from global flags
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Explicit expansion directory (`--expansion-dir` / `PAPI_EXPANSION_DIR`)
    pub expansion_dir: Option<PathBuf>,

    /// Skip the built-in expansions
    pub no_builtins: bool,
}

/// A populated registry and how it got that way
pub struct Session {
    pub registry: Registry,
    pub report: LoadReport,
    pub host_module: String,
}

impl Session {
    /// Builds the registry from built-ins and the expansion directory
    pub fn start(config: &Config, options: &SessionOptions) -> Self {
        let registry = Registry::new();
        let host_module = config.project.expansions.host_module.clone();
        let mut report = LoadReport::default();

        {
            let loader = Loader::new(&registry).host_module(host_module.as_str());

            if config.project.expansions.builtins && !options.no_builtins {
                report.merge(loader.load_host_modules(&[&CoreModule]));
            }

            if let Some(dir) = Self::directory_to_load(config, options) {
                tracing::debug!("Loading expansions from {}", dir.display());
                report.merge(loader.load_directory(&dir));
            }
        }

        Self {
            registry,
            report,
            host_module,
        }
    }

    /// Loads one more binary into the session's registry
    pub fn load_binary(&self, path: &Path) -> LoadReport {
        Loader::new(&self.registry)
            .host_module(self.host_module.as_str())
            .load_binary(path)
    }

    /// The directory to autoload, if any
    ///
    /// An explicit directory is always loaded so a typo is reported; the
    /// configured default is skipped quietly when it does not exist.
    fn directory_to_load(config: &Config, options: &SessionOptions) -> Option<PathBuf> {
        if let Some(dir) = &options.expansion_dir {
            return Some(dir.clone());
        }

        if !config.project.expansions.autoload {
            return None;
        }

        config.expansion_dir(None).filter(|dir| dir.is_dir())
    }
}
