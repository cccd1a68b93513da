//! HTTP request and response types.
//!
//! # Design
//! These types describe one request/response cycle as plain owned data. The
//! codec builds `HttpRequest` values and produces `HttpResponse` values; the
//! connection only ever sees bytes. Headers are serialized in insertion order
//! so the same inputs always produce the same request bytes.

use std::fmt;

use crate::headers::HeaderMap;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    /// Map a command-line method name to a method. Only `POST` (in any case)
    /// selects POST; every other name falls back to GET.
    pub fn from_command(name: &str) -> Self {
        if name.eq_ignore_ascii_case("POST") {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP/1.1 request ready to be written to a socket.
///
/// Built by `codec::build_request`; never mutated after serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Request line, headers, blank line, then the body verbatim.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {} HTTP/1.1\r\n", self.method, self.target);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body.as_bytes());
        }
        bytes
    }

    /// First value of the header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A parsed HTTP response.
///
/// The header block is kept as the decoded raw text; `header_map` offers a
/// structured view on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub code: u16,
    /// Raw decoded header block, status line included, separator excluded.
    pub headers: String,
    pub body: String,
}

impl HttpResponse {
    pub fn header_map(&self) -> HeaderMap {
        HeaderMap::parse(&self.headers)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
