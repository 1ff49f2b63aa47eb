//! HMAC-SHA256 signing for private API requests.
//!
//! The canonical query is every parameter plus `access_key` and `tonce`,
//! sorted by key (byte-wise) and joined as `key=value` pairs with `&`. The
//! signature is the lowercase hex HMAC-SHA256 of `METHOD|PATH|QUERY` keyed by
//! the secret, appended as `&signature=<hex>`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use log::warn;
use reqwest::Method;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `message` keyed by `secret_key`.
pub fn hmac_hex(message: &str, secret_key: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Sort parameters by key and join them as `k1=v1&k2=v2`.
pub fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build `{path}?{canonical_query}&signature={hex}` for a private request.
///
/// `params` must not already contain `access_key` or `tonce`; both are added
/// here. Output is fully determined by the inputs.
pub fn signed_path(
    method: &Method,
    path: &str,
    access_key: &str,
    secret_key: &str,
    params: &[(&str, &str)],
    tonce: u64,
) -> String {
    let tonce = tonce.to_string();
    let mut all = Vec::with_capacity(params.len() + 2);
    all.extend_from_slice(params);
    all.push(("access_key", access_key));
    all.push(("tonce", tonce.as_str()));

    let query = canonical_query(&all);
    let signature = hmac_hex(&format!("{}|{path}|{query}", method.as_str()), secret_key);
    format!("{path}?{query}&signature={signature}")
}

/// [`signed_path`] prefixed with `base_url`.
pub fn signed_url(
    base_url: &str,
    method: &Method,
    path: &str,
    access_key: &str,
    secret_key: &str,
    params: &[(&str, &str)],
    tonce: u64,
) -> String {
    let signed = signed_path(method, path, access_key, secret_key, params, tonce);
    format!("{base_url}{signed}")
}

/// Source of the `tonce` request nonce.
pub trait TonceSource: Send + Sync {
    fn tonce(&self) -> u64;
}

/// Current Unix time in whole seconds, scaled to milliseconds.
///
/// This is the resolution the exchange expects. Two requests signed within
/// the same second share a tonce.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTonce;

impl TonceSource for SystemTonce {
    fn tonce(&self) -> u64 {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        secs * 1000
    }
}

/// Always the same tonce. Useful for reproducible signatures.
#[derive(Clone, Copy, Debug)]
pub struct FixedTonce(pub u64);

impl TonceSource for FixedTonce {
    fn tonce(&self) -> u64 {
        self.0
    }
}

/// API credentials plus a tonce source.
pub struct Signer {
    access_key: String,
    secret_key: Zeroizing<String>,
    tonce: Box<dyn TonceSource>,
    last_tonce: AtomicU64,
}

impl Signer {
    /// Create a signer. Both keys must be non-empty.
    pub fn new(access_key: &str, secret_key: &str) -> Result<Self> {
        if access_key.is_empty() {
            return Err(Error::Credentials("access key is empty".into()));
        }
        if secret_key.is_empty() {
            return Err(Error::Credentials("secret key is empty".into()));
        }
        Ok(Self {
            access_key: access_key.to_string(),
            secret_key: Zeroizing::new(secret_key.to_string()),
            tonce: Box::new(SystemTonce),
            last_tonce: AtomicU64::new(0),
        })
    }

    /// Replace the tonce source (default [`SystemTonce`]).
    pub fn with_tonce_source(mut self, source: impl TonceSource + 'static) -> Self {
        self.tonce = Box::new(source);
        self
    }

    /// Sign a request, returning `{path}?{query}&signature={hex}`.
    pub fn sign(&self, method: &Method, path: &str, params: &[(&str, &str)]) -> String {
        let tonce = self.tonce.tonce();
        if self.last_tonce.swap(tonce, Ordering::Relaxed) == tonce {
            warn!("tonce {tonce} reused for {method} {path}; the server may reject the request");
        }
        signed_path(method, path, &self.access_key, &self.secret_key, params, tonce)
    }

    /// Sign a request and prefix it with `base_url`.
    pub fn signed_url(
        &self,
        base_url: &str,
        method: &Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> String {
        format!("{base_url}{}", self.sign(method, path, params))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
