//! API route definitions

mod health;
mod sports;

use axum::Router;
use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(sports::routes())
        .merge(health::routes())
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use axum::{body::Body, http::Request, Router};
    use serde_json::Value;
    use sports_core::SportsError;
    use sports_provider::{Query, Upstream};
    use sports_services::{InMemoryCache, SportsService};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use crate::{app, AppState};

    /// Upstream that answers fixed bodies per path and records the queries it saw
    #[derive(Default)]
    pub struct StubUpstream {
        bodies: HashMap<String, Value>,
        pub seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl StubUpstream {
        pub fn with(mut self, path: &str, body: Value) -> Self {
            self.bodies.insert(path.to_string(), body);
            self
        }
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        async fn get(&self, path: &str, query: &Query<'_>) -> Result<Value, SportsError> {
            let params = query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
            self.seen.lock().unwrap().push((path.to_string(), params));
            self.bodies
                .get(path)
                .cloned()
                .ok_or_else(|| SportsError::api(format!("Provider API error (404) on {}", path)))
        }
    }

    pub fn router(upstream: Arc<StubUpstream>) -> Router {
        let cache = Arc::new(InMemoryCache::new());
        let sports = SportsService::new(upstream, cache.clone());
        app(AppState::new(sports, cache))
    }

    /// Issue a GET and return status plus parsed JSON (or the raw text as a string)
    pub async fn get(router: Router, uri: &str) -> (u16, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }
}
