//! Archive assembly
//!
//! Downloads the requested files and packs the successful ones into an in-memory ZIP.

mod builder;
mod writer;

pub use builder::{ArchiveBuilder, BuiltArchive};
pub use writer::{entry_name, sanitize_archive_filename, write_zip, StagedEntry};
