use std::sync::Arc;

use tracing::debug;

use crate::config::DavConfig;
use crate::error::DavError;
use crate::model::{AccessMode, DavModel};
use crate::response::ResponsePayload;
use crate::stack::DirectoryStack;
use crate::transport::Transport;

/// Arguments for a dispatched operation. Fields an operation does not take
/// are ignored, loose-option-bag style.
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    /// Resource path, resolved against the navigation stack before dispatch.
    pub path: Option<String>,
    /// Copy/move destination, also resolved against the stack.
    pub destination: Option<String>,
    /// Upload body for `put`.
    pub data: Option<Vec<u8>>,
    /// Media subtype for `put`; `binary` when absent.
    pub media_type: Option<String>,
    /// Preview size hint for `get_preview`; `M` when absent.
    pub size: Option<String>,
    /// Access mode string for `chmod` (`a+r`/`a-r`); `a-r` when absent.
    pub mode: Option<String>,
    /// Listing window for `ls`.
    pub amount: Option<u32>,
    pub offset: Option<u32>,
}

impl RequestArgs {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// Session facade: shell-style navigation plus name-based verb dispatch.
///
/// The directory stack is the only mutable session state and is touched
/// strictly in call order from a single calling context; payload
/// normalization is pure and happens once the transport settles. There is no
/// cancellation hook below the transport: a caller wanting one cancels the
/// transport and discards the eventual result.
pub struct DavClient {
    model: DavModel,
    stack: DirectoryStack,
}

impl DavClient {
    pub fn new(config: DavConfig) -> Result<Self, DavError> {
        let stack = DirectoryStack::new(config.home_dir.clone());
        let model = DavModel::new(config)?;
        Ok(Self { model, stack })
    }

    /// Builds a client over a caller-supplied transport.
    pub fn with_transport(
        config: DavConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, DavError> {
        let stack = DirectoryStack::new(config.home_dir.clone());
        let model = DavModel::with_transport(config, transport)?;
        Ok(Self { model, stack })
    }

    pub fn model(&self) -> &DavModel {
        &self.model
    }

    // ============================================================================
    // Navigation surface, delegated to the stack
    // ============================================================================

    pub fn pushd(&mut self, target: &str) -> Vec<String> {
        self.stack.pushd(target)
    }

    pub fn popd(&mut self) -> Vec<String> {
        self.stack.popd()
    }

    pub fn dirs(&self) -> &[String] {
        self.stack.dirs()
    }

    pub fn pwd(&self) -> &str {
        self.stack.pwd()
    }

    pub fn normalize(&self, path: &str) -> String {
        self.stack.normalize(path)
    }

    pub fn resolve(&self, components: &[&str]) -> String {
        self.stack.resolve(components)
    }

    pub fn join(&self, components: &[&str]) -> String {
        self.stack.join(components)
    }

    /// Changes directory; an empty path or `~` goes home.
    pub fn cd(&mut self, path: &str) {
        if path.is_empty() || path == "~" {
            let home = self.model.config().home_dir.clone();
            self.stack.pushd(&home);
        } else {
            self.stack.pushd(path);
        }
    }

    // ============================================================================
    // Verb dispatch
    // ============================================================================

    /// Dispatches an operation by name, resolving `args.path` (and the
    /// destination, where one applies) against the current directory first.
    /// An unrecognized name is the one explicit failure path and surfaces as
    /// [`DavError::UnknownOperation`].
    pub async fn request(
        &self,
        operation: &str,
        args: RequestArgs,
    ) -> Result<ResponsePayload, DavError> {
        let path = self.stack.resolve(&[args.path.as_deref().unwrap_or("")]);
        debug!("dispatching '{}' for '{}'", operation, path);

        match operation {
            "get" => self.model.get(&path).await,
            "get_preview" => self.model.get_preview(&path, args.size.as_deref()).await,
            "put" => {
                self.model
                    .put(&path, args.data.unwrap_or_default(), args.media_type.as_deref())
                    .await
            }
            "cp" => {
                let destination = self.resolve_destination(&args);
                self.model.cp(&path, &destination).await
            }
            "mv" => {
                let destination = self.resolve_destination(&args);
                self.model.mv(&path, &destination).await
            }
            "rm" => self.model.rm(&path).await,
            "mkdir" => self.model.mkdir(&path).await,
            "ls" => self.model.ls(&path, args.amount, args.offset).await,
            "chmod" => {
                let mode = args
                    .mode
                    .as_deref()
                    .and_then(AccessMode::parse)
                    .unwrap_or(AccessMode::Private);
                self.model.chmod(&path, mode).await
            }
            "id" => self.model.id().await,
            "df" => self.model.df().await,
            _ => Err(DavError::UnknownOperation(operation.to_string())),
        }
    }

    fn resolve_destination(&self, args: &RequestArgs) -> String {
        self.stack
            .resolve(&[args.destination.as_deref().unwrap_or("")])
    }
}
