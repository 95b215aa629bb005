use bytes::Bytes;
use futures::{stream, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use zipdrop_core::models::{ArchiveRequest, FileOutcome, FileRequest, SkipReason};
use zipdrop_core::AppError;

use super::writer::{entry_name, write_zip, StagedEntry};
use crate::fetch::FileFetcher;

/// A finalized archive plus the per-file outcomes, in request order.
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub bytes: Bytes,
    pub outcomes: Vec<FileOutcome>,
}

impl BuiltArchive {
    /// Number of entries in the archive.
    pub fn entry_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_added()).count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (usize, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Skipped { position, reason } => Some((*position, reason)),
            FileOutcome::Added { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Accumulator for the fold over fetched files. Names are unique: a later file with the
/// same name replaces the earlier content in place (last write wins).
#[derive(Default)]
struct Staging {
    entries: Vec<StagedEntry>,
    by_name: HashMap<String, (usize, usize)>,
    outcomes: Vec<FileOutcome>,
}

impl Staging {
    fn push(&mut self, position: usize, name: String, fetched: Result<Bytes, SkipReason>) {
        let data = match fetched {
            Ok(data) => data,
            Err(reason) => {
                self.outcomes.push(FileOutcome::Skipped { position, reason });
                return;
            }
        };

        let size = data.len();
        match self.by_name.get(&name).copied() {
            Some((slot, previous_position)) => {
                tracing::warn!(
                    name = %name,
                    position,
                    previous_position,
                    "Duplicate entry name, later file replaces earlier one"
                );
                self.entries[slot].data = data;
                self.by_name.insert(name.clone(), (slot, position));
                self.outcomes[previous_position - 1] = FileOutcome::Skipped {
                    position: previous_position,
                    reason: SkipReason::Replaced {
                        by_position: position,
                    },
                };
            }
            None => {
                self.by_name
                    .insert(name.clone(), (self.entries.len(), position));
                self.entries.push(StagedEntry {
                    name: name.clone(),
                    data,
                });
            }
        }
        self.outcomes.push(FileOutcome::Added {
            position,
            name,
            size,
        });
    }
}

/// Downloads requested files and packs the successful ones into a ZIP archive.
///
/// A single file's failure never aborts the batch: missing URLs, non-success statuses
/// and transport errors all become `FileOutcome::Skipped`. The only error `build`
/// returns is a failure to serialize the archive itself.
#[derive(Clone)]
pub struct ArchiveBuilder {
    fetcher: Arc<dyn FileFetcher>,
    concurrency: usize,
}

impl ArchiveBuilder {
    /// `concurrency` bounds in-flight downloads; 1 fetches sequentially.
    pub fn new(fetcher: Arc<dyn FileFetcher>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn build(&self, request: &ArchiveRequest) -> Result<BuiltArchive, AppError> {
        // Owned futures keep the handler future free of per-item borrows.
        // `buffered` keeps results in input order whatever the completion order
        let fetches: Vec<_> = request
            .files
            .clone()
            .into_iter()
            .enumerate()
            .map(|(index, file)| self.fetch_entry(index + 1, file))
            .collect();
        let fetched: Vec<(usize, String, Result<Bytes, SkipReason>)> = stream::iter(fetches)
            .buffered(self.concurrency)
            .collect()
            .await;

        let staging = fetched
            .into_iter()
            .fold(Staging::default(), |mut staging, (position, name, result)| {
                staging.push(position, name, result);
                staging
            });

        let Staging {
            entries, outcomes, ..
        } = staging;

        let bytes = tokio::task::spawn_blocking(move || write_zip(&entries))
            .await
            .map_err(|e| AppError::Archive(format!("Archive task failed: {}", e)))??;

        let archive = BuiltArchive {
            bytes: Bytes::from(bytes),
            outcomes,
        };

        tracing::info!(
            archive_name = %request.archive_name,
            requested = request.files_count(),
            added = archive.entry_count(),
            archive_size = archive.len(),
            "Archive created"
        );

        Ok(archive)
    }

    async fn fetch_entry(
        &self,
        position: usize,
        file: FileRequest,
    ) -> (usize, String, Result<Bytes, SkipReason>) {
        let name = entry_name(file.name.as_deref(), position);
        let result = self.fetch_one(position, &name, &file).await;
        (position, name, result)
    }

    async fn fetch_one(
        &self,
        position: usize,
        name: &str,
        file: &FileRequest,
    ) -> Result<Bytes, SkipReason> {
        let Some(url) = file.url.as_deref() else {
            tracing::warn!(position, "Skipping file: no URL provided");
            return Err(SkipReason::MissingUrl);
        };

        tracing::info!(position, name = %name, url = %url, "Downloading");

        match self.fetcher.fetch(url).await {
            Ok(data) => {
                tracing::info!(position, name = %name, size = data.len(), "Added");
                Ok(data)
            }
            Err(err) => {
                tracing::warn!(position, name = %name, url = %url, error = %err, "Failed to download");
                Err(err.into())
            }
        }
    }
}
