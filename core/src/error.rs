//! Error types for the raw HTTP client.
//!
//! # Design
//! `Connect` gets a dedicated variant because callers treat "could not reach
//! the peer" differently from everything that happens after the socket is
//! up: the CLI exits with a distinct status for it. Failures while parsing
//! the reply (`MissingSeparator`, `InvalidStatusLine`) are reported instead of
//! producing a response with a made-up status code.

use std::io;

use thiserror::Error;

/// Errors returned by `HttpClient` and the codec/connection building blocks.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The URL could not be parsed or names no host.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The TCP connection to `authority` could not be established
    /// (refused, unreachable, or the name did not resolve).
    #[error("unable to connect to {authority}: {source}")]
    Connect {
        authority: String,
        #[source]
        source: io::Error,
    },

    /// Writing the request or reading the reply failed after connecting.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The reply contains no `\r\n\r\n` between header block and body.
    #[error("response has no header/body separator")]
    MissingSeparator,

    /// The first header line does not carry a three-digit status code.
    #[error("invalid status line: {0:?}")]
    InvalidStatusLine(String),
}

impl ClientError {
    /// True when the peer was never reached.
    pub fn is_connect(&self) -> bool {
        matches!(self, ClientError::Connect { .. })
    }
}
