use serde::{Deserialize, Serialize};

/// Gender codes understood by the service. Other values are passed through untouched.
pub mod gender {
    pub const UNSET: &str = "0";
    pub const MALE: &str = "1";
    pub const FEMALE: &str = "2";
}

/// Output formats for the save endpoints.
pub mod format {
    pub const SVG: &str = "svg";
    pub const PNG: &str = "png";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub size: u32,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub size: u32,
    pub gender: String,
    pub format: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSaveRequest {
    pub amount: u32,
    pub size: u32,
    pub gender: String,
    pub format: String,
}

/// Body of `POST /avatar/batch`, which always packages SVGs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub amount: u32,
    pub size: u32,
    pub gender: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarData {
    pub svg: String,
    pub size: u32,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub success: bool,
    // Failure bodies only carry `success` and `error`.
    #[serde(default)]
    pub data: AvatarData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AvatarResponse {
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}
