//! Minimal HTTP/1.1 client written directly against TCP sockets.
//!
//! # Overview
//! Sends one GET or POST per connection and parses the reply into a status
//! code, the raw header block and a decoded body. No TLS, no keep-alive, no
//! chunked decoding and no redirects.
//!
//! # Design
//! - `codec` builds request bytes and parses reply bytes without I/O.
//! - `connection` owns a single socket: connect, write, half-close, read
//!   until the peer closes.
//! - `HttpClient` wires the two together and returns typed errors instead
//!   of terminating the process.

pub mod client;
pub mod codec;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod http;

pub use client::{ClientConfig, HttpClient, DEFAULT_USER_AGENT};
pub use codec::{build_request, encode_form, parse_response, Encoding};
pub use connection::Connection;
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use headers::HeaderMap;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
