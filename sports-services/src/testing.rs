//! Scripted upstream used by the service tests

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use sports_core::SportsError;
use sports_provider::{Query, Upstream};
use std::collections::HashMap;

/// A recorded upstream request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Responder = Box<dyn Fn(&Call) -> Result<Value, SportsError> + Send + Sync>;

/// Upstream double: responses are scripted per path, every call is recorded
#[derive(Default)]
pub struct FakeUpstream {
    routes: Mutex<HashMap<String, Responder>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `path` with `body`
    pub fn respond(self, path: &str, body: Value) -> Self {
        self.respond_with(path, move |_| Ok(body.clone()))
    }

    /// Always fail `path`
    pub fn fail(self, path: &str) -> Self {
        let path_owned = path.to_string();
        self.respond_with(path, move |_| {
            Err(SportsError::api(format!("Provider API error (500) on {}", path_owned)))
        })
    }

    /// Answer `path` by inspecting the call
    pub fn respond_with(
        self,
        path: &str,
        f: impl Fn(&Call) -> Result<Value, SportsError> + Send + Sync + 'static,
    ) -> Self {
        self.routes.lock().insert(path.to_string(), Box::new(f));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls_to(path).len()
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn get(&self, path: &str, query: &Query<'_>) -> Result<Value, SportsError> {
        let call = Call {
            path: path.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        };
        self.calls.lock().push(call.clone());

        let routes = self.routes.lock();
        match routes.get(path) {
            Some(responder) => responder(&call),
            None => Err(SportsError::api(format!("Provider API error (404) on {}", path))),
        }
    }
}
