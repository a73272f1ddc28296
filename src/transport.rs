use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, warn};

use crate::config::DavConfig;
use crate::error::DavError;

/// Standardized User-Agent for all requests.
pub fn build_user_agent() -> String {
    format!("davshell/{} (WebDAV-Client)", env!("CARGO_PKG_VERSION"))
}

/// A single verb-based request handed across the transport boundary.
#[derive(Debug, Clone)]
pub struct DavRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl DavRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Raw outcome of a transport call, before normalization.
#[derive(Debug, Clone)]
pub struct DavResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// The transport capability consumed by the client core.
///
/// The core resolves paths before a call and normalizes the body once the
/// call settles; retries, caching and cancellation all live on the far side
/// of this seam.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: DavRequest) -> Result<DavResponse, DavError>;
}

/// reqwest-backed transport that injects the OAuth token and User-Agent on
/// every request.
pub struct HttpTransport {
    client: Client,
    access_token: String,
}

impl HttpTransport {
    pub fn new(config: &DavConfig) -> Result<Self, DavError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            access_token: config.access_token.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: DavRequest) -> Result<DavResponse, DavError> {
        debug!("📤 {} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header("Authorization", format!("OAuth {}", self.access_token))
            .header("User-Agent", build_user_agent());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(
            "📥 {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response.text().await?;

        // is_success covers 207 Multi-Status, the PROPFIND/PROPPATCH shape.
        if !status.is_success() {
            warn!("request to {} failed with {}", request.url, status);
            return Err(DavError::Status { status, body });
        }

        Ok(DavResponse {
            status,
            content_type,
            body,
        })
    }
}
