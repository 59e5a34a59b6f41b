//! Upstream identifiers and loose numeric fields
//!
//! The provider is inconsistent about whether identifiers and sequence
//! numbers arrive as JSON strings or numbers. Identifiers keep whatever
//! shape the provider sent; comparisons are exact, so `"1"` and `1` are
//! different IDs. Any other JSON value is kept verbatim rather than
//! rejecting the record that carries it.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// An identifier as returned by the provider (`marketId`, `event.id`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderId {
    Text(String),
    Number(Number),
    Other(Value),
}

impl ProviderId {
    /// Whether the ID is usable in a lookup (non-empty text, non-zero number,
    /// `true`, or any array/object)
    pub fn is_present(&self) -> bool {
        match self {
            ProviderId::Text(s) => !s.is_empty(),
            ProviderId::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
            ProviderId::Other(Value::Null) => false,
            ProviderId::Other(Value::Bool(b)) => *b,
            ProviderId::Other(_) => true,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Text(s) => write!(f, "{}", s),
            ProviderId::Number(n) => write!(f, "{}", n),
            ProviderId::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        ProviderId::Text(s.to_string())
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        ProviderId::Text(s)
    }
}

impl From<u64> for ProviderId {
    fn from(n: u64) -> Self {
        ProviderId::Number(Number::from(n))
    }
}

/// Read a sequence-style field (`sr_no`, `SelectionId`) as a number.
///
/// Numbers are used as-is, numeric strings are parsed, everything else
/// (missing, null, garbage) counts as 0.
pub fn numeric_or_zero(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    }
}
