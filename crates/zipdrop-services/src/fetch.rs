//! Remote file retrieval

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use zipdrop_core::models::SkipReason;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<FetchError> for SkipReason {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status(code) => SkipReason::HttpStatus(code),
            FetchError::Transport(msg) => SkipReason::Transport(msg),
        }
    }
}

/// Downloads one remote file. Implementations must bound every call with a timeout.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// `FileFetcher` backed by a shared reqwest client
#[derive(Clone, Debug)]
pub struct HttpFileFetcher {
    client: reqwest::Client,
}

impl HttpFileFetcher {
    /// `timeout` covers connecting, sending and reading the whole body.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to read response body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFileFetcher {
        HttpFileFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/photo.jpg")
            .with_status(200)
            .with_body(b"jpeg-bytes")
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/photo.jpg", server.url()))
            .await
            .unwrap();

        assert_eq!(body.as_ref(), b"jpeg-bytes");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.jpg")
            .with_status(404)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing.jpg", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(404)));
        assert_eq!(SkipReason::from(err), SkipReason::HttpStatus(404));
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // Port 1 is never served
        let err = fetcher().fetch("http://127.0.0.1:1/file.jpg").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
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
    async fn test_fetch_times_out_on_silent_host() {
        let base = silent_server().await;
        let fetcher = HttpFileFetcher::new(Duration::from_millis(300)).unwrap();

        let started = std::time::Instant::now();
        let err = fetcher.fetch(&format!("{}/slow.jpg", base)).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_transport_error() {
        let err = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
