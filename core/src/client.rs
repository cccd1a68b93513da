//! Stateless HTTP client driving one request per connection.
//!
//! # Design
//! `HttpClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Every call runs the same fixed sequence: parse the URL,
//! build the request, open a `Connection`, transmit, drain the reply until
//! the peer closes, then parse it. Errors are returned to the caller, who
//! decides whether a failure ends the program.

use crate::codec;
use crate::connection::{Connection, DEFAULT_CHUNK_SIZE};
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpResponse};

/// Identifier sent in the `User-agent` header unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = "A2Client";

/// Settings shared by every request an `HttpClient` makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Bytes requested per socket read while draining a reply.
    pub read_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            read_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Synchronous client performing exactly one request per connection.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn get(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.command(url, HttpMethod::Get, &[])
    }

    /// POST `args` as a form body. An empty slice sends an empty body.
    pub fn post(&self, url: &str, args: &[(String, String)]) -> Result<HttpResponse, ClientError> {
        self.command(url, HttpMethod::Post, args)
    }

    /// Run one full request/response cycle. Blocks until the server closes
    /// the connection.
    pub fn command(
        &self,
        url: &str,
        method: HttpMethod,
        args: &[(String, String)],
    ) -> Result<HttpResponse, ClientError> {
        let endpoint = Endpoint::parse(url)?;
        let request = codec::build_request(method, &endpoint, args, &self.config.user_agent);
        log::debug!("{method} {} on {}", request.target, endpoint.authority());

        let mut connection = Connection::open(&endpoint)?.with_chunk_size(self.config.read_chunk_size);
        if let Err(e) = connection.transmit(&request.to_bytes()) {
            connection.close();
            return Err(e);
        }
        let raw = connection.receive_all()?;

        let response = codec::parse_response(&raw)?;
        log::debug!("{} answered {}", endpoint.authority(), response.code);
        Ok(response)
    }
}
