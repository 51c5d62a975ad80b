//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub order_data_loaded: bool,
}

/// Query string of `GET /csv-to-json/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvQuery {
    pub file_path: String,
}
