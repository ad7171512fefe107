//! Connection manager: one GET per hop.
//!
//! The `Transport` trait is the seam between the fetch pipeline and the
//! network. `ReqwestTransport` is the production implementation; tests swap in
//! their own.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::error_handling::{categorize_reqwest_error, ScanError};
use crate::fetch::target::ResolvedTarget;
use crate::headers::HeaderMap;
use crate::user_agent::random_user_agent;

/// Transport protocols the connection manager can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Plain HTTP
    Http,
    /// HTTP over TLS
    Https,
}

impl Protocol {
    /// Maps a URL scheme onto a protocol.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::UnknownProtocol` for anything other than `http` or
    /// `https`. This is a configuration error and is never retried.
    pub fn from_scheme(scheme: &str) -> Result<Self, ScanError> {
        match scheme.to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(ScanError::UnknownProtocol(scheme.to_string())),
        }
    }

    /// The scheme string for this protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

/// Everything needed to issue a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    /// Plain or encrypted HTTP
    pub protocol: Protocol,
    /// Host with optional `:port`
    pub host: String,
    /// Path plus query string
    pub path: String,
    /// User-Agent header value
    pub user_agent: String,
    /// `None` lets the request block indefinitely
    pub timeout: Option<Duration>,
}

impl ConnectionRequest {
    /// The absolute URL this request targets.
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.protocol.as_str(), self.host, self.path)
    }
}

/// Status code and headers of a single response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
}

/// Performs a single GET and returns status and headers.
///
/// Implementations must not follow redirects themselves; the redirect resolver
/// decides what to do with a 3xx response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request with an empty body.
    async fn get(&self, request: &ConnectionRequest) -> Result<RawResponse, ScanError>;
}

/// `reqwest`-backed transport.
///
/// The wrapped client is expected to have redirects disabled (see
/// `initialization::init_client`).
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Arc<reqwest::Client>,
}

impl ReqwestTransport {
    /// Wraps an existing client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &ConnectionRequest) -> Result<RawResponse, ScanError> {
        let url = request.url();
        let mut builder = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, request.user_agent.as_str());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        let status = response.status().as_u16();
        debug!("GET {} -> {}", url, status);
        Ok(RawResponse {
            status,
            headers: HeaderMap::from_response(response.headers()),
        })
    }
}

/// Opens a connection for a resolved target and performs one GET.
///
/// The protocol is validated before the transport is touched, so an unknown
/// scheme never produces network traffic.
pub async fn open_and_get(
    transport: &dyn Transport,
    target: &ResolvedTarget,
    timeout: Option<Duration>,
) -> Result<RawResponse, ScanError> {
    let protocol = Protocol::from_scheme(&target.protocol)?;
    let request = ConnectionRequest {
        protocol,
        host: target.host.clone(),
        path: target.path.clone(),
        user_agent: random_user_agent().to_string(),
        timeout,
    };
    transport.get(&request).await
}
