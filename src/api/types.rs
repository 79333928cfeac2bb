use serde::{Deserialize, Serialize};

/// Query parameters for prefix search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Key prefix; empty matches everything
    #[serde(default)]
    pub q: String,
    /// Maximum number of results
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for exact lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExactParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Response after a reload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub generation: u64,
    pub entries: usize,
    pub keys: usize,
    pub took_ms: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub entries: usize,
    pub generation: u64,
}

/// API Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
