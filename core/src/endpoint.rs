//! Host, port and request target derived from a URL string.

use url::Url;

use crate::error::ClientError;

/// Port used when the URL does not name one. The scheme is never consulted,
/// so `https://host/` also lands on 80.
pub const DEFAULT_PORT: u16 = 80;

/// Where a single request goes. Created per request and immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    target: String,
}

impl Endpoint {
    /// Parse `url`. Input without `://` is read as `http://` + input. The
    /// scheme never selects the port: a port written in the URL is used as
    /// is, otherwise 80.
    pub fn parse(url: &str) -> Result<Self, ClientError> {
        let url = if url.contains("://") {
            url.to_string()
        } else {
            format!("http://{url}")
        };
        let parsed = Url::parse(&url).map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ClientError::InvalidUrl(format!("{url}: missing host")))?
            .to_string();

        // `Url::port` hides a port equal to the scheme's default.
        let port = if has_explicit_port(&url) {
            parsed.port_or_known_default()
        } else {
            parsed.port()
        }
        .unwrap_or(DEFAULT_PORT);

        let mut target = match parsed.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if let Some(query) = parsed.query() {
            target.push('?');
            target.push_str(query);
        }

        Ok(Self { host, port, target })
    }

    /// Hostname as written in the URL (IPv6 literals keep their brackets).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path plus query, always starting with `/`.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// `host:port`, resolvable through `ToSocketAddrs`.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// True when the authority of `url` ends in `:digits`.
fn has_explicit_port(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}
