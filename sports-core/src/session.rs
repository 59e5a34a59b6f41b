//! Session (fancy) entries and live scores

use crate::id::numeric_or_zero;
use crate::market::Sequenced;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// `gtype` value marking a session row in the generic session list
pub const SESSION_GTYPE: &str = "session";

/// One row of the `getSessions` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtype: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr_no: Option<Value>,

    #[serde(rename = "SelectionId", default, skip_serializing_if = "Option::is_none")]
    pub selection_id: Option<Value>,

    #[serde(rename = "RunnerName", default, skip_serializing_if = "Option::is_none")]
    pub runner_name: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    pub fn is_session(&self) -> bool {
        self.gtype.as_ref().and_then(Value::as_str) == Some(SESSION_GTYPE)
    }

    pub fn selection(&self) -> f64 {
        numeric_or_zero(self.selection_id.as_ref())
    }

    /// Runner name for sorting; missing, null, `false` and `0` read as empty
    pub fn name(&self) -> Cow<'_, str> {
        match &self.runner_name {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            None | Some(Value::Null) | Some(Value::Bool(false)) => Cow::Borrowed(""),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Cow::Borrowed(""),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

impl Sequenced for Session {
    fn sequence(&self) -> f64 {
        numeric_or_zero(self.sr_no.as_ref())
    }
}

/// Live score for a match. The provider's shape varies by sport, so the
/// payload is kept as-is; only its presence is meaningful here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(pub Value);

impl Score {
    /// Accept a score body only when it is a JSON object (or array)
    pub fn from_body(body: Value) -> Option<Self> {
        match body {
            Value::Object(_) | Value::Array(_) => Some(Score(body)),
            _ => None,
        }
    }
}
