//! zipdrop Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the archive services and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, WorkflowConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
