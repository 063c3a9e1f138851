//! Remote manifest fetching and artifact download
//!
//! The network is the one untrusted collaborator in the pipeline, so
//! every failure comes back as a typed error: timeout, connection
//! failure, bad status, or parse failure. Nothing here panics.

use crate::core::error::{Result, UpdateError};
use crate::core::types::RemoteManifest;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Source of manifests and artifacts.
///
/// The updater talks to the network only through this trait, which is
/// what lets the full state machine run against a local double in
/// tests.
pub trait RemoteSource {
    /// Fetch and parse the version manifest
    fn fetch_manifest(&self) -> Result<RemoteManifest>;

    /// Download `url` to `dest`; no partial file remains on failure
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// HTTP manifest source backed by a blocking reqwest client
pub struct HttpSource {
    manifest_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Build a client bound to `manifest_url` with a request timeout
    pub fn new(manifest_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("selfup/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| {
                UpdateError::configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            manifest_url: manifest_url.into(),
            client,
        })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl RemoteSource for HttpSource {
    fn fetch_manifest(&self) -> Result<RemoteManifest> {
        debug!(url = %self.manifest_url, "fetching remote manifest");
        let response = self.get(&self.manifest_url)?;

        let body = response
            .text()
            .map_err(|e| classify_request_error(&self.manifest_url, e))?;

        serde_json::from_str(&body)
            .map_err(|e| UpdateError::manifest_parse(format!("{}", e)))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url = %url, dest = %dest.display(), "downloading artifact");

        let result = (|| -> Result<()> {
            let mut response = self.get(url)?;
            let mut file = std::fs::File::create(dest)?;
            response
                .copy_to(&mut file)
                .map_err(|e| UpdateError::download(format!("{}", e)))?;
            Ok(())
        })();

        if result.is_err() && dest.exists() {
            let _ = std::fs::remove_file(dest);
        }
        result
    }
}

/// Map a reqwest error to the matching failure kind
fn classify_request_error(url: &str, e: reqwest::Error) -> UpdateError {
    if e.is_timeout() {
        UpdateError::NetworkTimeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        UpdateError::ConnectionFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    } else {
        UpdateError::download(e.to_string())
    }
}
