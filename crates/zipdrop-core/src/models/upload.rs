use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::constants::DEFAULT_EXPIRY;

use super::lenient::{scalar_text, truthy};

/// JSON body returned by the relay service. Every field is optional on the wire and
/// read loosely: `success` by truthiness, the others as scalar text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub link: Option<Value>,
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub expiry: Option<Value>,
}

/// Outcome of the single relay upload attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub link: Option<String>,
    pub key: Option<String>,
    pub expiry: Option<String>,
}

impl UploadResult {
    pub fn failed() -> Self {
        Self::default()
    }

    /// Interpret a parsed relay body. A success flag without a link is a failure.
    pub fn from_relay(body: RelayResponse) -> Self {
        let succeeded = body.success.as_ref().is_some_and(truthy);
        match body.link.as_ref().and_then(scalar_text) {
            Some(link) if succeeded => Self {
                success: true,
                link: Some(link),
                key: Some(body.key.as_ref().and_then(scalar_text).unwrap_or_default()),
                expiry: Some(
                    body.expiry
                        .as_ref()
                        .and_then(scalar_text)
                        .unwrap_or_else(|| DEFAULT_EXPIRY.to_string()),
                ),
            },
            _ => Self::failed(),
        }
    }
}

/// Success payload of `POST /create-zip` when the archive was relayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateZipResponse {
    pub success: bool,
    pub download_url: String,
    pub file_key: String,
    pub archive_name: String,
    /// Number of files requested, including the ones that failed to download
    pub files_count: usize,
    /// Archive size in bytes
    pub archive_size: usize,
    pub apartment_id: String,
    pub expiry: String,
}
