//! Job control DTOs

use serde::{Deserialize, Serialize};

/// Acknowledgement of a start request
///
/// The server answers with the fresh result snapshot; only `Running` matters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunAck {
    #[serde(rename = "Running", default)]
    pub running: bool,
}

/// Acknowledgement of a stop request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopAck {
    #[serde(default)]
    pub stopped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Server build version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}
