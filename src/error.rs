use thiserror::Error;

/// Errors surfaced across the client boundary.
///
/// Navigation never fails: over-popping the stack, popping past the root via
/// `..` and swapping a one-entry stack are all silent no-ops. The only
/// caller-input error is dispatching an unknown operation name; everything
/// else here propagates unmodified from configuration, parsing or transport.
#[derive(Debug, Error)]
pub enum DavError {
    #[error("there is no operation \"{0}\"")]
    UnknownOperation(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported verb: {0}")]
    Verb(String),

    #[error("malformed multi-status document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}
