//! Wire types of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::error::ApplyError;
use crate::types::{ProjectType, ThemeColors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyKind {
    Theme,
    Font,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyData {
    #[serde(default)]
    pub colors: Option<ThemeColors>,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub is_dark_mode: Option<bool>,
}

/// Body of `POST /api/apply`.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(rename = "type")]
    pub kind: ApplyKind,
    #[serde(default)]
    pub data: ApplyData,
}

/// A validated apply request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyCommand {
    Theme { colors: ThemeColors, is_dark_mode: bool },
    Font { family: String },
}

impl ApplyRequest {
    /// Check that `data` carries what `type` asks for.
    pub fn into_command(self) -> Result<ApplyCommand, ApplyError> {
        match (self.kind, self.data) {
            (ApplyKind::Theme, ApplyData { colors: Some(colors), is_dark_mode, .. }) => Ok(ApplyCommand::Theme {
                colors,
                is_dark_mode: is_dark_mode.unwrap_or(false),
            }),
            (ApplyKind::Font, ApplyData { font: Some(family), .. }) if !family.is_empty() => {
                Ok(ApplyCommand::Font { family })
            }
            _ => Err(ApplyError::Invalid),
        }
    }
}

/// Parse and validate a raw request body.
pub fn parse_apply_request(body: &[u8]) -> Result<ApplyCommand, ApplyError> {
    serde_json::from_slice::<ApplyRequest>(body)?.into_command()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_instruction: Option<String>,
}

impl ApplyResponse {
    /// A rejection that never reached the writer.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file: None,
            project_type: None,
            created: None,
            import_instruction: None,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub project_type: ProjectType,
    pub css_file: Option<String>,
}
