use std::sync::Arc;

use reqwest::Method;
use tracing::debug;

use crate::config::DavConfig;
use crate::error::DavError;
use crate::response::ResponsePayload;
use crate::transport::{DavRequest, DavResponse, HttpTransport, Transport};

/// Access mode applied by [`DavModel::chmod`]: public grants anonymous read
/// access through a shared link, private withdraws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    PublicRead,
    Private,
}

impl AccessMode {
    /// Parses the shell-style mode strings `a+r` and `a-r`.
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "a+r" => Some(Self::PublicRead),
            "a-r" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Verb-level request construction over the transport capability.
///
/// Paths are already absolute by the time they reach the model; navigation
/// and name-based dispatch live in the facade.
pub struct DavModel {
    config: DavConfig,
    transport: Arc<dyn Transport>,
}

impl DavModel {
    pub fn new(config: DavConfig) -> Result<Self, DavError> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self { config, transport })
    }

    /// Builds a model over a caller-supplied transport.
    pub fn with_transport(
        config: DavConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, DavError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &DavConfig {
        &self.config
    }

    async fn send(&self, request: DavRequest) -> Result<ResponsePayload, DavError> {
        let DavResponse {
            content_type, body, ..
        } = self.transport.send(request).await?;
        ResponsePayload::from_body(content_type.as_deref(), body)
    }

    /// GET: downloads the resource body.
    pub async fn get(&self, path: &str) -> Result<ResponsePayload, DavError> {
        self.send(DavRequest::new(Method::GET, self.config.url_for_path(path)))
            .await
    }

    /// GET with the preview query: a scaled-down rendition of an image.
    pub async fn get_preview(
        &self,
        path: &str,
        size: Option<&str>,
    ) -> Result<ResponsePayload, DavError> {
        let request = DavRequest::new(Method::GET, self.config.url_for_path(path))
            .query("preview", "")
            .query("size", size.unwrap_or("M"));
        self.send(request).await
    }

    /// PUT: uploads a file body.
    pub async fn put(
        &self,
        path: &str,
        data: Vec<u8>,
        media_type: Option<&str>,
    ) -> Result<ResponsePayload, DavError> {
        let content_type = format!("application/{}", media_type.unwrap_or("binary"));
        debug!("uploading {} bytes to '{}'", data.len(), path);
        let request = DavRequest::new(Method::PUT, self.config.url_for_path(path))
            .header("Content-Type", content_type)
            .body(data);
        self.send(request).await
    }

    /// COPY: duplicates `source` at `destination` server side.
    pub async fn cp(&self, source: &str, destination: &str) -> Result<ResponsePayload, DavError> {
        let request = DavRequest::new(verb("COPY")?, self.config.url_for_path(source))
            .header("Destination", destination);
        self.send(request).await
    }

    /// MOVE: renames `source` to `destination` server side.
    pub async fn mv(&self, source: &str, destination: &str) -> Result<ResponsePayload, DavError> {
        let request = DavRequest::new(verb("MOVE")?, self.config.url_for_path(source))
            .header("Destination", destination);
        self.send(request).await
    }

    /// DELETE: removes a file or directory.
    pub async fn rm(&self, path: &str) -> Result<ResponsePayload, DavError> {
        self.send(DavRequest::new(
            Method::DELETE,
            self.config.url_for_path(path),
        ))
        .await
    }

    /// MKCOL: creates a directory.
    pub async fn mkdir(&self, path: &str) -> Result<ResponsePayload, DavError> {
        self.send(DavRequest::new(
            verb("MKCOL")?,
            self.config.url_for_path(path),
        ))
        .await
    }

    /// PROPFIND with depth 1: lists a directory, optionally windowed by
    /// `amount` and `offset`.
    pub async fn ls(
        &self,
        path: &str,
        amount: Option<u32>,
        offset: Option<u32>,
    ) -> Result<ResponsePayload, DavError> {
        let mut request = DavRequest::new(verb("PROPFIND")?, self.config.url_for_path(path))
            .header("Depth", "1");
        if let Some(amount) = amount {
            request = request.query("amount", amount.to_string());
        }
        if let Some(offset) = offset {
            request = request.query("offset", offset.to_string());
        }
        self.send(request).await
    }

    /// PROPPATCH: grants or withdraws public read access on a resource.
    pub async fn chmod(&self, path: &str, mode: AccessMode) -> Result<ResponsePayload, DavError> {
        let body = match mode {
            AccessMode::PublicRead => concat!(
                "<propertyupdate xmlns=\"DAV:\">",
                "<set><prop>",
                "<public_url xmlns=\"urn:yandex:disk:meta\">true</public_url>",
                "</prop></set>",
                "</propertyupdate>"
            ),
            AccessMode::Private => concat!(
                "<propertyupdate xmlns=\"DAV:\">",
                "<remove><prop>",
                "<public_url xmlns=\"urn:yandex:disk:meta\"/>",
                "</prop></remove>",
                "</propertyupdate>"
            ),
        };

        let request =
            DavRequest::new(verb("PROPPATCH")?, self.config.url_for_path(path)).body(body);
        self.send(request).await
    }

    /// GET with the userinfo query on the service root: the login the token
    /// belongs to.
    pub async fn id(&self) -> Result<ResponsePayload, DavError> {
        let request =
            DavRequest::new(Method::GET, self.config.url_for_path("")).query("userinfo", "");
        self.send(request).await
    }

    /// PROPFIND with depth 0 on the service root: quota usage.
    pub async fn df(&self) -> Result<ResponsePayload, DavError> {
        let body = concat!(
            "<propfind xmlns=\"DAV:\">",
            "<prop>",
            "<quota-available-bytes/>",
            "<quota-used-bytes/>",
            "</prop>",
            "</propfind>"
        );

        let request = DavRequest::new(verb("PROPFIND")?, self.config.url_for_path(""))
            .header("Depth", "0")
            .body(body);
        self.send(request).await
    }
}

fn verb(name: &str) -> Result<Method, DavError> {
    Method::from_bytes(name.as_bytes()).map_err(|_| DavError::Verb(name.to_string()))
}
