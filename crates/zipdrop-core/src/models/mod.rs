//! Data models for the application
//!
//! Request payloads, per-file outcomes, relay results and response bodies.

mod archive;
mod health;
mod lenient;
mod outcome;
mod upload;

// Re-export all models for convenient imports
pub use archive::{ArchiveRequest, CreateZipRequest, FileRequest};
pub use health::HealthResponse;
pub use outcome::{FileOutcome, SkipReason};
pub use upload::{CreateZipResponse, RelayResponse, UploadResult};
