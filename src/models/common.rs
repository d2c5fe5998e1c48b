use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document returned by `GET /test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// A generated file found in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}
