use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DavError;

/// Separator for all remote paths, POSIX style.
pub const SEP: &str = "/";

/// Immutable per-session client configuration.
///
/// One value handed to the client at construction; nothing here is mutated
/// after that. Replaces ad-hoc globals for the base URL and home path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DavConfig {
    /// Base URL of the WebDAV endpoint, e.g. `https://webdav.example.com`.
    pub server_url: String,
    /// OAuth access token sent as `Authorization: OAuth <token>`.
    pub access_token: String,
    /// Home directory, absolute; also the initial working directory.
    pub home_dir: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl DavConfig {
    pub fn new(server_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            access_token: access_token.into(),
            home_dir: SEP.to_string(),
            timeout_seconds: 30,
        }
    }

    pub fn with_home_dir(mut self, home_dir: impl Into<String>) -> Self {
        self.home_dir = home_dir.into();
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Validates the configuration before any request is made.
    pub fn validate(&self) -> Result<(), DavError> {
        if self.server_url.trim().is_empty() {
            return Err(DavError::Config("server URL cannot be empty".to_string()));
        }
        Url::parse(self.server_url.trim()).map_err(|e| {
            DavError::Config(format!("invalid server URL '{}': {}", self.server_url, e))
        })?;
        if self.access_token.trim().is_empty() {
            return Err(DavError::Config("access token cannot be empty".to_string()));
        }
        if !self.home_dir.starts_with(SEP) {
            return Err(DavError::Config(format!(
                "home directory '{}' must be absolute",
                self.home_dir
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Configured base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        self.server_url.trim().trim_end_matches(SEP).to_string()
    }

    /// Builds the request URL for a resource path, percent-encoding each
    /// segment. An empty or root path maps to the base URL itself.
    pub fn url_for_path(&self, path: &str) -> String {
        let clean_path = path.trim_start_matches(SEP);
        if clean_path.is_empty() {
            return self.base_url();
        }

        let encoded: Vec<String> = clean_path
            .split(SEP)
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        format!("{}/{}", self.base_url(), encoded.join(SEP))
    }
}
