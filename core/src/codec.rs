//! Request serialization and response parsing.
//!
//! # Design
//! The codec never touches a socket: `build_request` turns a method, an
//! `Endpoint` and form arguments into an `HttpRequest`, and `parse_response`
//! turns the bytes accumulated by `Connection::receive_all` into an
//! `HttpResponse`. Both are pure functions of their inputs.
//!
//! Text encoding is chosen with a deliberately simple rule: if the raw header
//! bytes contain `utf-8` anywhere, header and body are decoded as UTF-8,
//! otherwise as ISO-8859-1. The charset parameter of `Content-Type` is not
//! parsed.

use url::form_urlencoded;

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Blank line between header block and body.
pub const SEPARATOR: &[u8] = b"\r\n\r\n";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Build the request for `method` against `endpoint`.
///
/// GET ignores `args` and carries no body. POST form-encodes `args` as its
/// body; an empty argument list yields an empty body with
/// `Content-Length: 0`.
pub fn build_request(
    method: HttpMethod,
    endpoint: &Endpoint,
    args: &[(String, String)],
    user_agent: &str,
) -> HttpRequest {
    let mut headers = vec![
        ("Host".to_string(), endpoint.host().to_string()),
        ("Accept".to_string(), "*/*".to_string()),
        ("User-agent".to_string(), user_agent.to_string()),
    ];

    let body = match method {
        HttpMethod::Get => {
            if !args.is_empty() {
                log::debug!("ignoring {} form argument(s) on GET", args.len());
            }
            None
        }
        HttpMethod::Post => {
            let body = encode_form(args);
            headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
            headers.push(("Content-Length".to_string(), body.len().to_string()));
            Some(body)
        }
    };

    HttpRequest {
        method,
        target: endpoint.target().to_string(),
        headers,
        body,
    }
}

/// `application/x-www-form-urlencoded` serialization of `args`, in order.
pub fn encode_form(args: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(args.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// Text encoding used to decode a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1. Every byte maps to the code point of the same value, so
    /// decoding never fails.
    Latin1,
}

impl Encoding {
    /// UTF-8 when the literal bytes `utf-8` occur in `header`, Latin-1
    /// otherwise. Case-sensitive.
    pub fn detect(header: &[u8]) -> Self {
        if find(header, b"utf-8").is_some() {
            Encoding::Utf8
        } else {
            Encoding::Latin1
        }
    }

    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

/// Parse a complete raw reply.
///
/// The buffer is split once, at the first `\r\n\r\n`. A buffer without the
/// separator is an error rather than a response with a default code.
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse, ClientError> {
    let split = find(raw, SEPARATOR).ok_or(ClientError::MissingSeparator)?;
    let (head, body) = (&raw[..split], &raw[split + SEPARATOR.len()..]);

    let encoding = Encoding::detect(head);
    log::debug!("decoding {} header and {} body bytes as {encoding:?}", head.len(), body.len());

    let headers = encoding.decode(head);
    let code = parse_status_code(&headers)?;

    Ok(HttpResponse {
        code,
        headers,
        body: encoding.decode(body),
    })
}

/// Status code from the first line of a decoded header block.
///
/// The line is split on whitespace and the second token must be exactly
/// three ASCII digits, so `HTTP/1.0`, `HTTP/1.1` and `HTTP/2` lines all work.
pub fn parse_status_code(headers: &str) -> Result<u16, ClientError> {
    let line = headers.lines().next().unwrap_or_default();
    let invalid = || ClientError::InvalidStatusLine(line.to_string());

    let token = line.split_whitespace().nth(1).ok_or_else(invalid)?;
    if token.len() != 3 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    token.parse().map_err(|_| invalid())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
