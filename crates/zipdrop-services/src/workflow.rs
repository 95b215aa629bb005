//! Archive workflow orchestration
//!
//! Builder, relay and delivery selection run linearly for each request. The workflow
//! holds only immutable configuration and shared HTTP clients, so one instance serves
//! every request concurrently.

use anyhow::Result;
use bytes::Bytes;
use std::sync::Arc;
use zipdrop_core::constants::DEFAULT_EXPIRY;
use zipdrop_core::models::{ArchiveRequest, CreateZipResponse, UploadResult};
use zipdrop_core::{AppError, WorkflowConfig};

use crate::archive::ArchiveBuilder;
use crate::fetch::{FileFetcher, HttpFileFetcher};
use crate::relay::{ArchiveRelay, HttpRelay};

/// How the finished archive reaches the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The relay accepted the archive; the caller gets a download link.
    Hosted(CreateZipResponse),
    /// Relay unavailable or disabled; the caller gets the archive bytes.
    Inline { archive_name: String, bytes: Bytes },
}

/// Pick the response for a finished archive from the relay outcome.
pub fn select_delivery(
    request: &ArchiveRequest,
    archive: Bytes,
    upload: UploadResult,
) -> Delivery {
    match upload {
        UploadResult {
            success: true,
            link: Some(link),
            key,
            expiry,
        } => Delivery::Hosted(CreateZipResponse {
            success: true,
            download_url: link,
            file_key: key.unwrap_or_default(),
            archive_name: request.archive_name.clone(),
            files_count: request.files_count(),
            archive_size: archive.len(),
            apartment_id: request.apartment_id.clone(),
            expiry: expiry.unwrap_or_else(|| DEFAULT_EXPIRY.to_string()),
        }),
        _ => Delivery::Inline {
            archive_name: request.archive_name.clone(),
            bytes: archive,
        },
    }
}

#[derive(Clone)]
pub struct ArchiveWorkflow {
    builder: ArchiveBuilder,
    relay: Arc<dyn ArchiveRelay>,
    relay_enabled: bool,
}

impl ArchiveWorkflow {
    pub fn new(
        config: &WorkflowConfig,
        fetcher: Arc<dyn FileFetcher>,
        relay: Arc<dyn ArchiveRelay>,
    ) -> Self {
        Self {
            builder: ArchiveBuilder::new(fetcher, config.fetch_concurrency),
            relay,
            relay_enabled: config.relay_enabled,
        }
    }

    /// Wire the HTTP-backed fetcher and relay.
    pub fn from_config(config: &WorkflowConfig) -> Result<Self> {
        let fetcher = HttpFileFetcher::new(config.fetch_timeout)?;
        let relay = HttpRelay::new(config.relay_url.clone(), config.relay_timeout)?;
        Ok(Self::new(config, Arc::new(fetcher), Arc::new(relay)))
    }

    pub fn relay_enabled(&self) -> bool {
        self.relay_enabled
    }

    /// Build the archive, try the relay once and choose the delivery.
    pub async fn run(&self, request: &ArchiveRequest) -> Result<Delivery, AppError> {
        let archive = self.builder.build(request).await?;

        let skipped = archive.skipped().count();
        if skipped > 0 {
            tracing::warn!(
                archive_name = %request.archive_name,
                skipped,
                requested = request.files_count(),
                "Some files were not added to the archive"
            );
        }
        let bytes = archive.bytes;

        let upload = if self.relay_enabled {
            self.relay.upload(bytes.clone(), &request.archive_name).await
        } else {
            tracing::debug!("Relay disabled, returning archive inline");
            UploadResult::failed()
        };

        let delivery = select_delivery(request, bytes, upload);
        match &delivery {
            Delivery::Hosted(response) => tracing::info!(
                download_url = %response.download_url,
                archive_size = response.archive_size,
                "Archive delivered via relay"
            ),
            Delivery::Inline { bytes, .. } => tracing::info!(
                archive_size = bytes.len(),
                "Returning archive directly"
            ),
        }
        Ok(delivery)
    }
}
