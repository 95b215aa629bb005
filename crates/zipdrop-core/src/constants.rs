//! Fixed values shared by the services and the HTTP layer.

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "ZIP Archive Service";

/// Archive name used when the request does not provide one.
pub const DEFAULT_ARCHIVE_NAME: &str = "archive.zip";

/// Apartment identifier used when the request does not provide one.
pub const DEFAULT_APARTMENT_ID: &str = "unknown";

/// Expiry reported when the relay response omits it.
pub const DEFAULT_EXPIRY: &str = "14 days";

/// Default relay endpoint.
pub const DEFAULT_RELAY_URL: &str = "https://file.io";

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Client-facing message for malformed create-zip requests.
pub const MISSING_FILES_MESSAGE: &str = "Missing 'files' array in request";

/// Client-facing message for unexpected archive failures.
pub const ARCHIVE_FAILURE_MESSAGE: &str = "Failed to create archive";

/// Synthesized entry name for a file without a declared name. `position` is 1-based.
pub fn default_entry_name(position: usize) -> String {
    format!("file_{}.jpg", position)
}
