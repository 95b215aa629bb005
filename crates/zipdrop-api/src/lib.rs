//! zipdrop API Library
//!
//! This crate provides the HTTP handlers, error conversion and application setup for the
//! ZIP archive service.

mod api_doc;
mod handlers;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{HttpAppError, ValidatedJson};
pub use state::AppState;
