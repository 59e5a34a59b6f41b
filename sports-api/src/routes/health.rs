//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use sports_services::CacheStats;

use crate::AppState;

/// Cache section of the health response
#[derive(Debug, Serialize)]
struct CacheHealth {
    total: usize,
    fresh: usize,
    expired: usize,
}

impl From<CacheStats> for CacheHealth {
    fn from(stats: CacheStats) -> Self {
        Self {
            total: stats.total,
            fresh: stats.fresh,
            expired: stats.expired,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    cache: CacheHealth,
}

/// Health check handler; also drops expired cache entries
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    state.cache.purge_expired();

    let response = HealthResponse {
        status: "healthy".to_string(),
        cache: state.cache.stats().into(),
    };

    (StatusCode::OK, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{get, router, StubUpstream};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_liveness() {
        let (status, body) = get(router(Arc::new(StubUpstream::default())), "/api/health/live").await;

        assert_eq!(status, 200);
        assert_eq!(body, json!("OK"));
    }

    #[tokio::test]
    async fn test_health_reports_cache() {
        let upstream = Arc::new(StubUpstream::default().with("/getMarkets", json!([])));
        let app = router(upstream);

        get(app.clone(), "/api/sports/4/matches/1/markets").await;
        let (status, body) = get(app, "/api/health").await;

        assert_eq!(status, 200);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cache"]["total"], 1);
        assert_eq!(body["cache"]["fresh"], 1);
    }
}
