//! zipdrop Services Layer
//!
//! This crate hosts the archive workflow: downloading the requested files, assembling the
//! ZIP archive, relaying it to the temporary-hosting service and choosing how the result
//! is delivered. Thin HTTP handling stays in zipdrop-api.

pub mod archive;
pub mod fetch;
pub mod relay;
pub mod workflow;

pub use archive::{ArchiveBuilder, BuiltArchive};
pub use fetch::{FetchError, FileFetcher, HttpFileFetcher};
pub use relay::{ArchiveRelay, HttpRelay, RelayError};
pub use workflow::{select_delivery, ArchiveWorkflow, Delivery};
