//! Test helpers: build the router against a mockito server that plays both the remote
//! file host and the relay.
//!
//! Run from workspace root: `cargo test -p zipdrop-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zipdrop_api::setup::{routes, services};
use zipdrop_core::Config;

/// Path the relay mock listens on
pub const RELAY_PATH: &str = "/upload";

/// Test application: server plus the mock upstream it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub upstream: mockito::ServerGuard,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Absolute URL of a path on the mock upstream
    pub fn file_url(&self, path: &str) -> String {
        format!("{}{}", self.upstream.url(), path)
    }

    /// Serve `body` with 200 at `path`
    pub async fn serve_file(&mut self, path: &str, body: &str) -> mockito::Mock {
        self.upstream
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body(body)
            .create_async()
            .await
    }

    /// Answer GET `path` with the given status
    pub async fn fail_file(&mut self, path: &str, status: usize) -> mockito::Mock {
        self.upstream
            .mock("GET", path)
            .with_status(status)
            .with_body("nope")
            .create_async()
            .await
    }

    /// Relay answering with the given status and raw body
    pub async fn relay_responds(&mut self, status: usize, body: &str) -> mockito::Mock {
        self.upstream
            .mock("POST", RELAY_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Relay that must never be contacted
    pub async fn relay_never_called(&mut self) -> mockito::Mock {
        self.upstream
            .mock("POST", RELAY_PATH)
            .expect(0)
            .create_async()
            .await
    }
}

/// Setup a test app whose relay is enabled.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup a test app with extra configuration variables.
pub async fn setup_test_app_with(extra: &[(&str, &str)]) -> TestApp {
    let upstream = mockito::Server::new_async().await;

    let mut vars: HashMap<String, String> = HashMap::from([
        (
            "RELAY_URL".to_string(),
            format!("{}{}", upstream.url(), RELAY_PATH),
        ),
        ("FETCH_TIMEOUT_SECS".to_string(), "5".to_string()),
        ("RELAY_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_vars(|key| vars.get(key).cloned()).expect("config");
    config.validate().expect("valid config");

    let state = services::initialize_services(&config).expect("services");
    let router = routes::setup_routes(&config, state);
    let server = TestServer::new(router).expect("test server");

    TestApp { server, upstream }
}

/// Entries of a ZIP archive as (name, content), in archive order.
pub fn zip_entries(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("entry");
            let mut content = String::new();
            file.read_to_string(&mut content).expect("utf-8 entry");
            (file.name().to_string(), content)
        })
        .collect()
}
