//! Error types and handling for appledocs-core operations.
//!
//! Errors are categorized for easier handling and carry enough context to decide
//! whether an operation should be retried.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: File system operations on the documentation cache
//! - **Network Errors**: HTTP requests, connectivity issues, non-success statuses
//! - **Response Errors**: Payloads that fail shape validation
//! - **Parse Errors**: JSON documents that do not match the expected schema
//! - **Storage Errors**: Cache directory management
//! - **Configuration Errors**: Invalid settings or config files
//! - **Request Errors**: Caller input that cannot be honoured
//!
//! ## Recovery Hints
//!
//! [`Error::is_recoverable`] drives the retry loop in [`crate::fetcher`]:
//!
//! ```rust
//! use appledocs_core::Error;
//!
//! let transient = Error::HttpStatus { status: 503, url: "https://example.com".into() };
//! let permanent = Error::HttpStatus { status: 404, url: "https://example.com".into() };
//!
//! assert!(transient.is_recoverable());
//! assert!(!permanent.is_recoverable());
//! ```

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// HTTP status codes that are worth retrying.
const RETRYABLE_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// The main error type for appledocs-core operations.
///
/// All public functions in appledocs-core return `Result<T, Error>`. The source
/// chain is preserved, so wrapped failures such as [`Error::RetriesExhausted`]
/// still expose the original cause through [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reads and writes inside the cache directory.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Network operation failed before a response was received.
    ///
    /// ## Recoverability
    ///
    /// Connection resets, aborts, connect failures and timeouts are recoverable.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
        /// Full URL that was requested.
        url: String,
    },

    /// The server answered, but the payload failed validation.
    ///
    /// Empty objects, `null`, scalars and error envelopes all land here. These
    /// responses are never cached and never retried.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A retryable failure persisted through every allowed attempt.
    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts that were made.
        attempts: u32,
        /// The last failure observed.
        #[source]
        source: Box<Error>,
    },

    /// A document did not match the expected schema.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Cache storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Local index operation failed.
    #[error("Index error: {0}")]
    Index(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    ///
    /// Also raised once a cross-framework resolution has exhausted every
    /// candidate; the message lists the candidates that were tried.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied input that cannot be honoured.
    ///
    /// Selection of a technology that is not a framework collection, or an
    /// identifier with an invalid shape.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operation timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for transient network conditions (connection reset,
    /// aborted or refused connections, timeouts) and for HTTP 429, 500, 502,
    /// 503 and 504. Everything else, including other 4xx statuses and
    /// validation failures, is permanent.
    ///
    /// ```rust
    /// use appledocs_core::Error;
    /// use std::io;
    ///
    /// assert!(Error::Timeout("slow".into()).is_recoverable());
    /// assert!(Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset")).is_recoverable());
    /// assert!(!Error::InvalidResponse("empty object".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => {
                e.is_timeout() || e.is_connect() || source_chain_has_transient_io(e)
            },
            Self::HttpStatus { status, .. } => RETRYABLE_STATUSES.contains(status),
            Self::Timeout(_) => true,
            Self::Io(e) => is_transient_io_kind(e.kind()),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful as a structured logging field.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) | Self::HttpStatus { .. } | Self::RetriesExhausted { .. } => {
                "network"
            },
            Self::InvalidResponse(_) => "invalid_response",
            Self::Parse(_) => "parse",
            Self::Serialization(_) => "serialization",
            Self::Storage(_) => "storage",
            Self::Index(_) => "index",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Timeout(_) => "timeout",
            Self::Other(_) => "other",
        }
    }

    /// HTTP status carried by this error, looking through retry wrappers.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RetriesExhausted { source, .. } => source.http_status(),
            _ => None,
        }
    }
}

const fn is_transient_io_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
    )
}

fn source_chain_has_transient_io(err: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = current {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if is_transient_io_kind(io_err.kind()) {
                return true;
            }
        }
        current = cause.source();
    }
    false
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
