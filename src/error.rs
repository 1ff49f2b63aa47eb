//! Error types for the access layer.

/// Errors that can occur while talking to the exchange or decoding its replies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure: DNS, refused connection, timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response without a structured error body.
    #[error("server returned HTTP response code {0}")]
    HttpStatus(String),

    /// Non-2xx response carrying the exchange's error envelope.
    #[error("{status}; {code}: {message}")]
    Server {
        status: String,
        code: i64,
        message: String,
    },

    /// Response body is not valid JSON.
    #[error("malformed JSON: {0}")]
    Decode(String),

    #[error("{field}: expected {expected} but nothing found")]
    MissingValue {
        field: String,
        expected: &'static str,
    },

    #[error("{field}: expected {expected} but {found} found")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("can't parse time: {0}")]
    TimeFormat(String),

    #[error("credentials error: {0}")]
    Credentials(String),
}

impl Error {
    /// Whether the response arrived but its body had an unexpected shape.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::Decode(_)
                | Error::MissingValue { .. }
                | Error::TypeMismatch { .. }
                | Error::TimeFormat(_)
        )
    }

    /// Prefix the field path of a decode error with its enclosing location.
    ///
    /// `price` under `[2]` becomes `[2].price`; `[2].price` under `asks`
    /// becomes `asks[2].price`. Other variants pass through unchanged.
    pub(crate) fn at(self, prefix: &str) -> Self {
        let join = |field: String| {
            if field.is_empty() {
                prefix.to_string()
            } else if field.starts_with('[') {
                format!("{prefix}{field}")
            } else {
                format!("{prefix}.{field}")
            }
        };
        match self {
            Error::MissingValue { field, expected } => Error::MissingValue {
                field: join(field),
                expected,
            },
            Error::TypeMismatch {
                field,
                expected,
                found,
            } => Error::TypeMismatch {
                field: join(field),
                expected,
                found,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
