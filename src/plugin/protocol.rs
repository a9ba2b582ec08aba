//! Expansion binary protocol types
//!
//! Expansion binaries communicate via JSON messages over stdin/stdout.
//! Each binary must support the `--manifest` flag to declare its expansions.

use serde::{Deserialize, Serialize};

use crate::placeholder::{Capability, Context};

/// Manifest printed by `<binary> --manifest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionManifest {
    /// Module name (e.g., "weather")
    pub name: String,

    /// Module version
    #[serde(default)]
    pub version: String,

    /// Expansions provided by this binary
    #[serde(default)]
    pub expansions: Vec<ManifestEntry>,
}

/// One expansion declared in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Tag identifier the expansion answers to
    pub identifier: String,

    /// Author to contact about the expansion
    #[serde(default)]
    pub author: String,

    /// Resolution entry points the binary implements
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

/// A message sent to an expansion binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginRequest {
    /// The operation to perform
    pub operation: String,

    /// Operation-specific parameters
    pub params: serde_json::Value,
}

impl PluginRequest {
    pub fn new(operation: impl Into<String>, params: impl Into<serde_json::Value>) -> Self {
        Self {
            operation: operation.into(),
            params: params.into(),
        }
    }

    /// Builds a `resolve` request for one tag
    pub fn resolve(identifier: &str, parameters: &str, context: Option<&Context>) -> Self {
        let mut params = serde_json::json!({
            "identifier": identifier,
            "parameters": parameters,
        });
        if let Some(context) = context {
            params["context"] = serde_json::json!(context);
        }
        Self::new("resolve", params)
    }
}

/// A response from an expansion binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Result data (if success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Error message (if failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PluginResponse {
    #[cfg(test)]
    pub fn success(data: impl Into<serde_json::Value>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    #[cfg(test)]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Interprets the data of a `resolve` response
    ///
    /// Strings are used verbatim, `null` or missing data means no value, and
    /// other JSON values are rendered as JSON text.
    pub fn resolved_value(&self) -> Option<String> {
        match self.data.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parsing() {
        let json = r#"{
            "name": "weather",
            "version": "0.1.0",
            "expansions": [
                {"identifier": "temp", "author": "ops", "capabilities": ["context_free"]},
                {"identifier": "mood"}
            ]
        }"#;

        let manifest: ExpansionManifest = serde_json::from_str(json).unwrap();

        assert_eq!(manifest.name, "weather");
        assert_eq!(manifest.expansions.len(), 2);
        assert_eq!(manifest.expansions[0].capabilities, vec![Capability::ContextFree]);
        assert!(manifest.expansions[1].capabilities.is_empty());
        assert_eq!(manifest.expansions[1].author, "");
    }

    #[test]
    fn resolve_request_without_context() {
        let request = PluginRequest::resolve("temp", "celsius", None);
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains(r#""operation":"resolve""#));
        assert!(json.contains(r#""parameters":"celsius""#));
        assert!(!json.contains("context"));
    }

    #[test]
    fn resolve_request_with_context() {
        let ctx = Context::new("p1").with_attribute("team", "red");
        let request = PluginRequest::resolve("temp", "celsius", Some(&ctx));

        assert_eq!(request.params["context"]["id"], "p1");
        assert_eq!(request.params["context"]["attributes"]["team"], "red");
    }

    #[test]
    fn response_values() {
        assert_eq!(
            PluginResponse::success("21C").resolved_value(),
            Some("21C".to_string())
        );
        assert_eq!(PluginResponse::success(serde_json::Value::Null).resolved_value(), None);
        assert_eq!(
            PluginResponse::success(serde_json::json!(42)).resolved_value(),
            Some("42".to_string())
        );

        let response: PluginResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(response.resolved_value(), None);
    }

    #[test]
    fn response_error() {
        let response = PluginResponse::error("Something went wrong");

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }
}
