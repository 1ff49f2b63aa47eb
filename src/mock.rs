//! In-memory transport for tests: canned replies per route, recorded requests.
//!
//! ```ignore
//! use kuna::mock::MockTransport;
//! use serde_json::json;
//!
//! let transport = MockTransport::builder()
//!     .on_get("/api/v2/timestamp", json!(1503919000))
//!     .on_post_status("/api/v2/orders", 401, r#"{"error":{"code":2002,"message":"bad key"}}"#)
//!     .build();
//! ```
//!
//! Routes match on the URL path only; the query string is ignored. Unknown
//! routes answer `404 Not Found`.

use std::sync::Mutex;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::error::Result;
use crate::transport::{Transport, read_response};

#[derive(Clone, Debug)]
enum Reply {
    Json(Value),
    Status(u16, String),
}

#[derive(Clone, Debug)]
struct Route {
    method: Method,
    path: String,
    reply: Reply,
}

/// A request seen by the mock.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
}

impl RecordedRequest {
    /// Value of a query parameter, if present.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.url.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Path part of the URL, without scheme, host or query.
    pub fn path(&self) -> &str {
        url_path(&self.url)
    }
}

fn url_path(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = rest.find('/').map_or("", |i| &rest[i..]);
    path.split_once('?').map_or(path, |(p, _)| p)
}

/// Builder for [`MockTransport`].
#[derive(Default)]
pub struct MockTransportBuilder {
    routes: Vec<Route>,
}

impl MockTransportBuilder {
    fn route(mut self, method: Method, path: &str, reply: Reply) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            reply,
        });
        self
    }

    pub fn on_get(self, path: &str, body: Value) -> Self {
        self.route(Method::GET, path, Reply::Json(body))
    }

    pub fn on_post(self, path: &str, body: Value) -> Self {
        self.route(Method::POST, path, Reply::Json(body))
    }

    /// Answer GETs on `path` with a raw status and body.
    pub fn on_get_status(self, path: &str, status: u16, body: &str) -> Self {
        self.route(Method::GET, path, Reply::Status(status, body.to_string()))
    }

    pub fn on_post_status(self, path: &str, status: u16, body: &str) -> Self {
        self.route(Method::POST, path, Reply::Status(status, body.to_string()))
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        }
    }
}

/// A [`Transport`] that never touches the network.
pub struct MockTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder::default()
    }

    /// Every request made so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, method: Method, url: &str) -> Result<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            url: url.to_string(),
        });

        let path = url_path(url);
        let route = self
            .routes
            .iter()
            .find(|r| r.method == method && r.path == path);
        match route.map(|r| &r.reply) {
            Some(Reply::Json(body)) => Ok(body.clone()),
            Some(Reply::Status(code, body)) => {
                let status =
                    StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                read_response(status, body.as_bytes())
            }
            None => read_response(StatusCode::NOT_FOUND, b""),
        }
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<Value> {
        self.respond(Method::GET, url)
    }

    fn post(&self, url: &str) -> Result<Value> {
        self.respond(Method::POST, url)
    }
}
