//! Relay upload to the temporary-hosting service
//!
//! Exactly one attempt per archive. Every failure is recovered here and reported as an
//! unsuccessful `UploadResult` so the caller can fall back to returning the bytes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use zipdrop_core::constants::ZIP_CONTENT_TYPE;
use zipdrop_core::models::{RelayResponse, UploadResult};

/// Number of body characters included in relay logs
const LOGGED_BODY_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Relay response is not valid JSON: {source}")]
    InvalidBody {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

#[async_trait]
pub trait ArchiveRelay: Send + Sync {
    /// Upload the finalized archive. Never fails: errors yield `success = false`.
    async fn upload(&self, archive: Bytes, archive_name: &str) -> UploadResult;
}

/// `ArchiveRelay` posting a multipart `file` field to a file.io-compatible endpoint
#[derive(Clone, Debug)]
pub struct HttpRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create relay HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_upload(
        &self,
        archive: Bytes,
        archive_name: &str,
    ) -> Result<RelayResponse, RelayError> {
        let length = archive.len() as u64;
        let part =
            reqwest::multipart::Part::stream_with_length(reqwest::Body::from(archive), length)
                .file_name(archive_name.to_string())
                .mime_str(ZIP_CONTENT_TYPE)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::info!(
            status = status.as_u16(),
            body = %truncate_chars(&body, LOGGED_BODY_CHARS),
            "Relay response received"
        );

        if !status.is_success() {
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| RelayError::InvalidBody { source, body })
    }
}

#[async_trait]
impl ArchiveRelay for HttpRelay {
    async fn upload(&self, archive: Bytes, archive_name: &str) -> UploadResult {
        tracing::info!(
            endpoint = %self.endpoint,
            archive_name = %archive_name,
            archive_size = archive.len(),
            "Uploading archive to relay"
        );

        match self.try_upload(archive, archive_name).await {
            Ok(body) => {
                let result = UploadResult::from_relay(body);
                if result.success {
                    tracing::info!(link = ?result.link, "Relay upload successful");
                } else {
                    tracing::warn!("Relay declined the upload or returned no link");
                }
                result
            }
            Err(RelayError::InvalidBody { source, body }) => {
                tracing::error!(error = %source, body = %body, "Failed to parse relay response");
                UploadResult::failed()
            }
            Err(err) => {
                tracing::error!(error = %err, "Error uploading archive to relay");
                UploadResult::failed()
            }
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn relay(server: &mockito::Server) -> HttpRelay {
        HttpRelay::new(format!("{}/", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_upload_success_sends_multipart_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="flat.zip""#.to_string()),
                Matcher::Regex("application/zip".to_string()),
                Matcher::Regex("PK-payload".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"link":"https://x/1","key":"1"}"#)
            .create_async()
            .await;

        let result = relay(&server)
            .upload(Bytes::from_static(b"PK-payload"), "flat.zip")
            .await;

        mock.assert_async().await;
        assert!(result.success);
        assert_eq!(result.link.as_deref(), Some("https://x/1"));
        assert_eq!(result.key.as_deref(), Some("1"));
        assert_eq!(result.expiry.as_deref(), Some("14 days"));
    }

    #[tokio::test]
    async fn test_upload_declined() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"success":false,"message":"quota exceeded"}"#)
            .create_async()
            .await;

        let result = relay(&server).upload(Bytes::from_static(b"PK"), "a.zip").await;
        assert_eq!(result, UploadResult::failed());
    }

    #[tokio::test]
    async fn test_upload_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = relay(&server).upload(Bytes::from_static(b"PK"), "a.zip").await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_upload_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .with_body(r#"{"success":true,"link":"https://x/1"}"#)
            .create_async()
            .await;

        let relay = relay(&server);
        let err = relay
            .try_upload(Bytes::from_static(b"PK"), "a.zip")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Status { status: 503, .. }));
        assert!(!relay.upload(Bytes::from_static(b"PK"), "a.zip").await.success);
    }

    #[tokio::test]
    async fn test_upload_unreachable_relay() {
        let relay = HttpRelay::new("http://127.0.0.1:1/", Duration::from_secs(5)).unwrap();
        let result = relay.upload(Bytes::from_static(b"PK"), "a.zip").await;
        assert!(!result.success);
    }

    /// Accepts connections and never answers them.
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_upload_times_out_on_silent_relay() {
        let base = silent_server().await;
        let relay = HttpRelay::new(format!("{}/", base), Duration::from_millis(300)).unwrap();

        let started = std::time::Instant::now();
        let err = relay
            .try_upload(Bytes::from_static(b"PK"), "a.zip")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Transport(ref e) if e.is_timeout()));

        let result = relay.upload(Bytes::from_static(b"PK"), "a.zip").await;
        assert!(!result.success);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }
}
