//! Blocking HTTP transport with bounded timeouts.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::decode::{ServerError, decode_error_payload};
use crate::error::{Error, Result};
use crate::json;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://kuna.io";

/// Process-wide transport settings, built once and passed to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Total time allowed for one request, connect included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Idle keep-alive connections retained per host.
    pub max_idle_per_host: usize,
    pub idle_timeout: Duration,
    pub tcp_keepalive: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(4),
            connect_timeout: Duration::from_secs(3),
            max_idle_per_host: 5,
            idle_timeout: Duration::from_secs(35 * 60),
            tcp_keepalive: Duration::from_secs(30 * 60),
        }
    }
}

impl ClientConfig {
    /// Set the base URL; a trailing slash is dropped.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_idle_per_host(mut self, n: usize) -> Self {
        self.max_idle_per_host = n;
        self
    }
}

/// Something that can carry a request to the exchange and hand back JSON.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Value>;

    /// POST with an empty body; parameters travel in the query string.
    fn post(&self, url: &str) -> Result<Value>;
}

/// reqwest-backed transport. Clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(config.idle_timeout)
            .tcp_keepalive(config.tcp_keepalive)
            .build()?;
        Ok(Self { client })
    }

    fn execute(&self, method: Method, url: &str) -> Result<Value> {
        debug!("{method} {}", without_query(url));
        let resp = self
            .client
            .request(method, url)
            .send()
            .map_err(reqwest::Error::without_url)?;
        let status = resp.status();
        // The error envelope is best effort; an unreadable body on a
        // failed request still reports the status line.
        let body = if status.is_success() {
            resp.bytes().map_err(reqwest::Error::without_url)?
        } else {
            resp.bytes().unwrap_or_default()
        };
        read_response(status, &body)
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Value> {
        self.execute(Method::GET, url)
    }

    fn post(&self, url: &str) -> Result<Value> {
        self.execute(Method::POST, url)
    }
}

/// Query strings of private requests carry the access key and signature.
fn without_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// Turn a status and body into decoded JSON or the matching error.
///
/// 2xx bodies are parsed as JSON. Anything else becomes [`Error::Server`]
/// when the body carries the exchange's error envelope, or
/// [`Error::HttpStatus`] with the bare status line otherwise.
pub fn read_response(status: StatusCode, body: &[u8]) -> Result<Value> {
    if status.is_success() {
        return json::parse(body);
    }
    let status_line = status.to_string();
    match decode_error_payload(body) {
        Some(ServerError { code, message }) => Err(Error::Server {
            status: status_line,
            code,
            message,
        }),
        None => Err(Error::HttpStatus(status_line)),
    }
}
