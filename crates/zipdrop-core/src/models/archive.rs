use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::constants::{DEFAULT_APARTMENT_ID, DEFAULT_ARCHIVE_NAME, MISSING_FILES_MESSAGE};
use crate::AppError;

use super::lenient::scalar_text;

/// One requested file.
///
/// Entries are decoded leniently: a non-object entry, or a `url` that is not a string,
/// decodes to an absent field instead of rejecting the whole request. A scalar `name` is
/// read as text. An entry without a URL is skipped by the archive builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct FileRequest {
    pub url: Option<String>,
    pub name: Option<String>,
}

impl From<Value> for FileRequest {
    fn from(value: Value) -> Self {
        Self {
            url: value
                .get("url")
                .filter(|v| v.is_string())
                .and_then(scalar_text),
            name: value.get("name").and_then(scalar_text),
        }
    }
}

impl FileRequest {
    pub fn new(url: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            url: Some(url.into()),
            name: name.map(String::from),
        }
    }
}

/// Wire body of `POST /create-zip`
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateZipRequest {
    /// Files to download, each `{ "url": string, "name"?: string }`
    #[schema(value_type = Vec<Object>)]
    pub files: Option<Vec<FileRequest>>,
    /// Archive file name (default `archive.zip`)
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    /// Opaque identifier echoed back in the response (default `unknown`)
    #[schema(value_type = Option<String>)]
    pub apartment_id: Option<Value>,
}

/// Validated archive request, immutable for the lifetime of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub files: Vec<FileRequest>,
    pub archive_name: String,
    pub apartment_id: String,
}

impl ArchiveRequest {
    pub fn new(files: Vec<FileRequest>) -> Self {
        Self {
            files,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            apartment_id: DEFAULT_APARTMENT_ID.to_string(),
        }
    }

    /// Number of files the caller asked for, whether or not they were retrieved.
    pub fn files_count(&self) -> usize {
        self.files.len()
    }
}

impl TryFrom<CreateZipRequest> for ArchiveRequest {
    type Error = AppError;

    fn try_from(body: CreateZipRequest) -> Result<Self, Self::Error> {
        let files = body
            .files
            .ok_or_else(|| AppError::InvalidInput(MISSING_FILES_MESSAGE.to_string()))?;

        Ok(Self {
            files,
            archive_name: body
                .name
                .as_ref()
                .and_then(scalar_text)
                .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
            apartment_id: body
                .apartment_id
                .as_ref()
                .and_then(scalar_text)
                .unwrap_or_else(|| DEFAULT_APARTMENT_ID.to_string()),
        })
    }
}
