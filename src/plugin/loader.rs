//! Expansion discovery and loading
//!
//! Expansions are discovered from:
//! 1. Host modules already known to the host (except the host itself)
//! 2. A directory of expansion binaries
//! 3. A single expansion binary path
//!
//! Every expansion type is instantiated and registered on its own; a failure
//! is recorded in the [`LoadReport`], logged, and loading moves on.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::host::{ExpansionType, HostModule};
use super::process::ExternalModule;
use crate::placeholder::{panic_message, Registration, Registry, RegistryError};

/// Name the host module goes by unless configured otherwise
pub const DEFAULT_HOST_MODULE: &str = "papi";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The specified expansion file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read expansion directory {path}: {message}")]
    Directory { path: PathBuf, message: String },

    #[error("Failed to load expansion module from {path}: {message}")]
    Module { path: PathBuf, message: String },

    #[error("Failed to instantiate {type_name}: {message}")]
    Instantiate { type_name: String, message: String },

    #[error(transparent)]
    Register(#[from] RegistryError),
}

/// A single failed candidate
#[derive(Debug)]
pub struct LoadFailure {
    /// Module name or path the failure belongs to
    pub source: String,

    pub error: LoadError,
}

impl Serialize for LoadFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("LoadFailure", 2)?;
        s.serialize_field("source", &self.source)?;
        s.serialize_field("error", &self.error.to_string())?;
        s.end()
    }
}

/// Outcome of a loading batch
#[derive(Debug, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<Registration>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// True if nothing failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Appends another report's outcomes
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded.extend(other.loaded);
        self.failures.extend(other.failures);
    }

    fn fail(&mut self, source: impl Into<String>, error: LoadError) {
        let source = source.into();
        tracing::error!("[Importer SafeGuard] An error was found inside {}: {}", source, error);
        self.failures.push(LoadFailure { source, error });
    }
}

/// Loads expansions into a registry
pub struct Loader<'r> {
    registry: &'r Registry,
    host_module: String,
}

impl<'r> Loader<'r> {
    /// Creates a loader for the given registry
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            host_module: DEFAULT_HOST_MODULE.to_string(),
        }
    }

    /// Sets the name of the hosting module, which is never imported
    pub fn host_module(mut self, name: impl Into<String>) -> Self {
        self.host_module = name.into();
        self
    }

    /// Registers expansions from modules already known to the host
    pub fn load_host_modules(&self, modules: &[&dyn HostModule]) -> LoadReport {
        let mut report = LoadReport::default();

        for module in modules.iter().filter(|m| m.name() != self.host_module) {
            tracing::debug!("[Importer Manager] Try importing module {}", module.name());
            self.load_module(*module, &mut report);
        }

        report
    }

    /// Registers expansions from every binary in a directory
    ///
    /// Binaries that fail to load are reported and skipped.
    pub fn load_directory(&self, dir: &Path) -> LoadReport {
        let mut report = LoadReport::default();

        let binaries = match find_binaries(dir) {
            Ok(binaries) => binaries,
            Err(e) => {
                report.fail(
                    dir.display().to_string(),
                    LoadError::Directory {
                        path: dir.to_path_buf(),
                        message: e.to_string(),
                    },
                );
                return report;
            }
        };

        for path in binaries {
            self.load_binary_into(&path, &mut report);
        }

        report
    }

    /// Registers expansions from one binary
    pub fn load_binary(&self, path: &Path) -> LoadReport {
        let mut report = LoadReport::default();

        if !path.exists() {
            report.fail(
                path.display().to_string(),
                LoadError::NotFound(path.to_path_buf()),
            );
            return report;
        }

        self.load_binary_into(path, &mut report);
        report
    }

    fn load_binary_into(&self, path: &Path, report: &mut LoadReport) {
        tracing::debug!("[Importer Manager] Try importing binary {}", path.display());

        match ExternalModule::open(path) {
            Ok(module) => self.load_module(&module, report),
            Err(e) => report.fail(
                path.display().to_string(),
                LoadError::Module {
                    path: path.to_path_buf(),
                    message: format!("{:#}", e),
                },
            ),
        }
    }

    fn load_module(&self, module: &dyn HostModule, report: &mut LoadReport) {
        let types = match panic::catch_unwind(AssertUnwindSafe(|| module.expansion_types())) {
            Ok(types) => types,
            Err(payload) => {
                report.fail(
                    module.name(),
                    LoadError::Instantiate {
                        type_name: module.name().to_string(),
                        message: panic_message(payload.as_ref()),
                    },
                );
                return;
            }
        };

        for ty in types {
            match self.instantiate_and_register(module.name(), &ty) {
                Ok(registration) => {
                    tracing::debug!(
                        module = %module.name(),
                        "registered expansion {}",
                        registration.identifier
                    );
                    report.loaded.push(registration);
                }
                Err(error) => report.fail(module.name(), error),
            }
        }
    }

    fn instantiate_and_register(
        &self,
        module: &str,
        ty: &ExpansionType,
    ) -> Result<Registration, LoadError> {
        let instantiate_error = |message: String| LoadError::Instantiate {
            type_name: ty.name().to_string(),
            message,
        };

        let expansion = match panic::catch_unwind(AssertUnwindSafe(|| ty.instantiate())) {
            Ok(Ok(expansion)) => expansion,
            Ok(Err(e)) => return Err(instantiate_error(format!("{:#}", e))),
            Err(payload) => return Err(instantiate_error(panic_message(payload.as_ref()))),
        };

        let registration = panic::catch_unwind(AssertUnwindSafe(|| {
            self.registry.register_from(module, expansion)
        }))
        .map_err(|payload| instantiate_error(panic_message(payload.as_ref())))??;

        Ok(registration)
    }
}

/// Lists expansion binaries in a directory, sorted by file name
fn find_binaries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut binaries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_executable(path))
        .collect();
    binaries.sort();
    Ok(binaries)
}

/// Checks if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = path.metadata() {
            return meta.permissions().mode() & 0o111 != 0;
        }
    }

    #[cfg(windows)]
    {
        if let Some(ext) = path.extension() {
            return ext == "exe" || ext == "bat" || ext == "cmd";
        }
    }

    false
}
