//! Generic JSON tree and strict typed accessors.
//!
//! Responses are parsed into a [`serde_json::Value`] and then read field by
//! field. Every accessor is total: an absent key or a JSON `null` yields
//! [`Error::MissingValue`], a value of the wrong shape yields
//! [`Error::TypeMismatch`], and nothing panics on untrusted input.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Longest rendering of an offending value kept in an error message.
const MAX_FOUND_CHARS: usize = 64;

/// Text timestamp layouts accepted by [`expect_time_text`], in trial order.
// `%.f` also matches an absent fraction.
const UTC_TEXT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const OFFSET_TEXT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Parse a response body into a generic JSON tree.
pub fn parse(body: &[u8]) -> Result<Value> {
    let value: Value = serde_json::from_slice(body).map_err(|e| Error::Decode(e.to_string()))?;
    debug!("decoded JSON: {value}");
    Ok(value)
}

/// Short human-readable rendering of a value and its kind, for error messages.
pub fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    };
    let mut text = value.to_string();
    if text.chars().count() > MAX_FOUND_CHARS {
        text = text.chars().take(MAX_FOUND_CHARS).collect();
        text.push_str("...");
    }
    format!("{text} ({kind})")
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn missing(field: &str, expected: &'static str) -> Error {
    Error::MissingValue {
        field: field.to_string(),
        expected,
    }
}

fn mismatch(field: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        expected,
        found: describe(found),
    }
}

pub fn expect_str<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a str> {
    match present(value) {
        None => Err(missing(field, "string")),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(mismatch(field, "string", other)),
    }
}

pub fn expect_bool(value: Option<&Value>, field: &str) -> Result<bool> {
    match present(value) {
        None => Err(missing(field, "bool")),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(mismatch(field, "bool", other)),
    }
}

/// Integral number that fits in `i64`. Floats and numeric strings are rejected.
pub fn expect_int(value: Option<&Value>, field: &str) -> Result<i64> {
    match present(value) {
        None => Err(missing(field, "int")),
        Some(v) => v.as_i64().ok_or_else(|| mismatch(field, "int", v)),
    }
}

/// Finite float from a JSON number or a numeric string.
///
/// The exchange quotes most prices and volumes as strings (`"4075.0"`).
pub fn expect_float(value: Option<&Value>, field: &str) -> Result<f64> {
    match present(value) {
        None => Err(missing(field, "float")),
        Some(v) => float_of(v, field),
    }
}

/// Like [`expect_float`], but an absent or `null` value reads as `default`.
pub fn expect_float_or(value: Option<&Value>, field: &str, default: f64) -> Result<f64> {
    match present(value) {
        None => Ok(default),
        Some(v) => float_of(v, field),
    }
}

fn float_of(value: &Value, field: &str) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| mismatch(field, "float", value))
}

pub fn expect_list<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a [Value]> {
    match present(value) {
        None => Err(missing(field, "list")),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(mismatch(field, "list", other)),
    }
}

pub fn expect_map<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a Map<String, Value>> {
    match present(value) {
        None => Err(missing(field, "dict")),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(mismatch(field, "dict", other)),
    }
}

/// Timestamp given as Unix epoch seconds (integer number).
pub fn expect_time(value: Option<&Value>, field: &str) -> Result<DateTime<Utc>> {
    let secs = expect_int(value, field)?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::TimeFormat(secs.to_string()))
}

/// Timestamp given as ISO-8601 text.
pub fn expect_time_text(value: Option<&Value>, field: &str) -> Result<DateTime<Utc>> {
    match present(value) {
        None => Err(missing(field, "time")),
        Some(Value::String(s)) => parse_time_text(s),
        Some(other) => Err(mismatch(field, "time", other)),
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SSZ`, `...±HHMM` or `...±HH:MM`, in that order.
/// Each layout takes optional fractional seconds.
pub fn parse_time_text(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = NaiveDateTime::parse_from_str(text, UTC_TEXT_FORMAT) {
        return Ok(t.and_utc());
    }
    OFFSET_TEXT_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| Error::TimeFormat(text.to_string()))
}

/// Path-aware view of a JSON object.
///
/// Accessors report errors against the bare key; decoders that know where the
/// object sits in the response prefix the path afterwards.
#[derive(Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// View `value` as an object, failing if it is anything else.
    pub fn of(value: &'a Value, field: &str) -> Result<Self> {
        expect_map(Some(value), field).map(|map| Fields { map })
    }

    /// View the object stored under `key`.
    pub fn object(&self, key: &str) -> Result<Fields<'a>> {
        expect_map(self.map.get(key), key).map(|map| Fields { map })
    }

    pub fn str(&self, key: &str) -> Result<&'a str> {
        expect_str(self.map.get(key), key)
    }

    pub fn string(&self, key: &str) -> Result<String> {
        self.str(key).map(str::to_string)
    }

    pub fn bool(&self, key: &str) -> Result<bool> {
        expect_bool(self.map.get(key), key)
    }

    pub fn int(&self, key: &str) -> Result<i64> {
        expect_int(self.map.get(key), key)
    }

    pub fn float(&self, key: &str) -> Result<f64> {
        expect_float(self.map.get(key), key)
    }

    pub fn float_or(&self, key: &str, default: f64) -> Result<f64> {
        expect_float_or(self.map.get(key), key, default)
    }

    pub fn list(&self, key: &str) -> Result<&'a [Value]> {
        expect_list(self.map.get(key), key)
    }

    pub fn time(&self, key: &str) -> Result<DateTime<Utc>> {
        expect_time(self.map.get(key), key)
    }

    pub fn time_text(&self, key: &str) -> Result<DateTime<Utc>> {
        expect_time_text(self.map.get(key), key)
    }

    /// Read a string field and map it through `parse`; `None` is a type mismatch.
    pub fn parsed<T>(
        &self,
        key: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        let value = self.map.get(key);
        let text = expect_str(value, key)?;
        parse(text).ok_or_else(|| Error::TypeMismatch {
            field: key.to_string(),
            expected,
            found: value.map(describe).unwrap_or_default(),
        })
    }
}
