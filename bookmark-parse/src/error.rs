use serde::{Deserialize, Serialize};

/// Fatal import failures. Anything short of these is tolerated by omission.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to tokenize bookmark markup: {message}")]
    Parse { message: String },

    #[error(
        "Unsupported bookmark JSON format: expected a Chromium `roots` object or a canonical `root` document"
    )]
    UnsupportedFormat,

    #[error("Malformed bookmark JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// A finding produced by [`crate::validate`].
///
/// Diagnostics are non-fatal: a document with diagnostics is still a valid
/// tree, it just carries data a reader may want to look at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
