//! Expansions provided by external binaries
//!
//! Opening a binary runs it with `--manifest`; every resolution spawns it
//! again with one JSON request on stdin and reads one JSON response line.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::host::{ExpansionType, HostModule};
use super::protocol::{ExpansionManifest, ManifestEntry, PluginRequest, PluginResponse};
use crate::placeholder::{Capabilities, Capability, Context, ContextBound, ContextFree, Expansion};

/// An expansion binary whose manifest has been read
#[derive(Debug, Clone)]
pub struct ExternalModule {
    path: Arc<PathBuf>,
    manifest: ExpansionManifest,
}

impl ExternalModule {
    /// Runs `<path> --manifest` and parses the result
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new(path)
            .arg("--manifest")
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute expansion binary: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Expansion binary returned error: {}", stderr.trim());
        }

        let manifest: ExpansionManifest = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse manifest of {}", path.display()))?;

        Ok(Self {
            path: Arc::new(path.to_path_buf()),
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &ExpansionManifest {
        &self.manifest
    }
}

impl HostModule for ExternalModule {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn expansion_types(&self) -> Vec<ExpansionType> {
        self.manifest
            .expansions
            .iter()
            .map(|entry| {
                let path = Arc::clone(&self.path);
                let entry = entry.clone();
                ExpansionType::new(entry.identifier.clone(), move || {
                    Ok(Box::new(ProcessExpansion::new(Arc::clone(&path), entry.clone()))
                        as Box<dyn Expansion>)
                })
            })
            .collect()
    }
}

/// One expansion served by an external binary
#[derive(Debug)]
pub struct ProcessExpansion {
    path: Arc<PathBuf>,
    identifier: String,
    author: String,
    capabilities: Capabilities,
}

impl ProcessExpansion {
    fn new(path: Arc<PathBuf>, entry: ManifestEntry) -> Self {
        Self {
            path,
            capabilities: entry.capabilities.iter().copied().collect(),
            identifier: entry.identifier,
            author: entry.author,
        }
    }

    /// Sends one request; failures are logged and count as "no value"
    fn call(&self, parameters: &str, context: Option<&Context>) -> Option<String> {
        let request = PluginRequest::resolve(&self.identifier, parameters, context);
        match self.execute(&request) {
            Ok(response) if response.success => response.resolved_value(),
            Ok(response) => {
                tracing::warn!(
                    identifier = %self.identifier,
                    "Expansion binary {} reported an error: {}",
                    self.path.display(),
                    response.error.as_deref().unwrap_or("Unknown error")
                );
                None
            }
            Err(e) => {
                tracing::warn!(identifier = %self.identifier, "{:#}", e);
                None
            }
        }
    }

    fn execute(&self, request: &PluginRequest) -> Result<PluginResponse> {
        let mut child = Command::new(self.path.as_path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn expansion binary: {}", self.path.display()))?;

        let exchanged = self.exchange(&mut child, request);
        if exchanged.is_err() {
            // The binary may still be running; it has nothing left to say.
            if let Err(e) = child.kill() {
                tracing::debug!("kill {} after failed exchange: {}", self.path.display(), e);
            }
        }

        // Always reap, success or not.
        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for expansion binary: {}", self.path.display()))?;
        let response_line = exchanged?;

        if !status.success() {
            tracing::debug!("{} exited with {} after replying", self.path.display(), status);
        }

        serde_json::from_str(&response_line).context("Failed to parse expansion response")
    }

    /// Writes the request line, closes stdin, and reads one response line
    fn exchange(&self, child: &mut Child, request: &PluginRequest) -> Result<String> {
        let mut stdin = child
            .stdin
            .take()
            .context("Failed to open expansion stdin")?;
        let request_json = serde_json::to_string(request).context("Failed to serialize request")?;
        writeln!(stdin, "{}", request_json).context("Failed to write to expansion binary")?;
        // End of input for the binary.
        drop(stdin);

        let stdout = child
            .stdout
            .take()
            .context("Failed to open expansion stdout")?;
        BufReader::new(stdout)
            .lines()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No response from {}", self.path.display()))?
            .context("Failed to read expansion response")
    }
}

impl Expansion for ProcessExpansion {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn context_bound(&self) -> Option<&dyn ContextBound> {
        self.capabilities
            .contains(Capability::ContextBound)
            .then_some(self as &dyn ContextBound)
    }

    fn context_free(&self) -> Option<&dyn ContextFree> {
        self.capabilities
            .contains(Capability::ContextFree)
            .then_some(self as &dyn ContextFree)
    }
}

impl ContextBound for ProcessExpansion {
    fn resolve_for(&self, context: &Context, parameters: &str) -> Option<String> {
        self.call(parameters, Some(context))
    }
}

impl ContextFree for ProcessExpansion {
    fn resolve(&self, parameters: &str) -> Option<String> {
        self.call(parameters, None)
    }
}
