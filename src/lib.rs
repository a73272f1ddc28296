//! Async client for WebDAV-style file-hosting services.
//!
//! The crate combines two pieces: shell-like navigation over remote paths
//! (`pushd`/`popd`/`pwd` backed by POSIX-style path resolution) and a
//! normalization layer that turns either a multi-status XML document or the
//! flat `key:value` text fallback into one canonical ordered tree. Everything
//! between those two (verb construction, auth headers, transport I/O) is
//! thin plumbing behind the [`Transport`] seam.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod path;
pub mod response;
pub mod stack;
pub mod transport;

// Re-export main types for convenience
pub use client::{DavClient, RequestArgs};
pub use config::{DavConfig, SEP};
pub use error::DavError;
pub use model::{AccessMode, DavModel};
pub use path::PathResolver;
pub use response::{Element, PlainPayload, Record, ResponsePayload, StructuredPayload};
pub use stack::{DirectoryStack, SWAP_MARKER};
pub use transport::{DavRequest, DavResponse, HttpTransport, Transport};
