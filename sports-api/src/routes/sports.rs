//! Sports, match and odds endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sports_core::ProviderId;
use sports_services::ResultKind;
use tracing::{debug, info};

use crate::AppState;

/// Query parameters carrying a comma-separated market ID list
#[derive(Debug, Deserialize)]
pub struct MarketIdsQuery {
    #[serde(rename = "marketId")]
    pub market_id: Option<String>,
}

/// Query parameters for sessions
#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    /// Session type filter forwarded to the provider
    pub gtype: Option<String>,
}

/// Response for list endpoints
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create sports routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sports", get(list_sports))
        .route("/sports/{event_type_id}/series", get(list_series))
        .route(
            "/sports/{event_type_id}/series/{competition_id}/matches",
            get(list_matches),
        )
        .route("/sports/{event_type_id}/tree", get(series_tree))
        .route("/sports/{event_type_id}/score-matches", get(score_matches))
        .route("/sports/{event_type_id}/odds", get(odds))
        .route("/sports/{event_type_id}/bookmaker-odds", get(bookmaker_odds))
        .route("/sports/{event_type_id}/bookmakers", get(bookmakers))
        .route("/sports/{event_type_id}/results/{kind}", get(results))
        .route(
            "/sports/{event_type_id}/matches/{match_id}/markets",
            get(match_markets),
        )
        .route(
            "/sports/{event_type_id}/matches/{match_id}/markets-with-odds",
            get(match_markets_with_odds),
        )
        .route(
            "/sports/{event_type_id}/matches/{match_id}/bookmakers",
            get(match_bookmakers),
        )
        .route(
            "/sports/{event_type_id}/matches/{match_id}/bookmakers-with-odds",
            get(match_bookmakers_with_odds),
        )
        .route(
            "/sports/{event_type_id}/matches/{match_id}/sessions",
            get(match_sessions),
        )
        .route(
            "/sports/{event_type_id}/matches/{match_id}/premium-fancy",
            get(match_premium_fancy),
        )
        .route("/sports/{event_type_id}/matches/{match_id}/score", get(match_score))
        .route(
            "/sports/{event_type_id}/matches/{match_id}/details",
            get(match_details),
        )
}

/// Split a comma-separated `marketId` value, skipping blanks
fn parse_market_ids(raw: Option<&str>) -> Vec<ProviderId> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ProviderId::from)
        .collect()
}

fn list<T: Serialize>(items: Vec<T>) -> Json<ListResponse<T>> {
    Json(ListResponse::from(items))
}

// ============================================================================
// Listings
// ============================================================================

async fn list_sports(State(state): State<AppState>) -> impl IntoResponse {
    let sports = state.sports.sports().await;
    info!("Returning {} sports", sports.len());
    list(sports)
}

async fn list_series(
    State(state): State<AppState>,
    Path(event_type_id): Path<String>,
) -> impl IntoResponse {
    list(state.sports.series_list(&event_type_id).await)
}

async fn list_matches(
    State(state): State<AppState>,
    Path((event_type_id, competition_id)): Path<(String, String)>,
) -> impl IntoResponse {
    list(state.sports.match_list(&event_type_id, &competition_id).await)
}

async fn series_tree(
    State(state): State<AppState>,
    Path(event_type_id): Path<String>,
) -> impl IntoResponse {
    let tree = state.sports.series_with_matches(&event_type_id).await;
    info!("Returning {} series for sport {}", tree.len(), event_type_id);
    list(tree)
}

async fn score_matches(
    State(state): State<AppState>,
    Path(event_type_id): Path<String>,
) -> impl IntoResponse {
    list(state.sports.score_matches(&event_type_id).await)
}

// ============================================================================
// Odds by market ID
// ============================================================================

async fn odds(
    State(state): State<AppState>,
    Path(event_type_id): Path<String>,
    Query(params): Query<MarketIdsQuery>,
) -> impl IntoResponse {
    let market_ids = parse_market_ids(params.market_id.as_deref());
    list(state.sports.odds(&event_type_id, &market_ids).await)
}

async fn bookmaker_odds(
    State(state): State<AppState>,
    Path(event_type_id): Path<String>,
    Query(params): Query<MarketIdsQuery>,
) -> impl IntoResponse {
    let market_ids = parse_market_ids(params.market_id.as_deref());
    list(state.sports.bookmaker_odds(&event_type_id, &market_ids).await)
}

async fn bookmakers(
    State(state): State<AppState>,
    Path(event_type_id): Path<String>,
    Query(params): Query<MarketIdsQuery>,
) -> impl IntoResponse {
    let market_ids = parse_market_ids(params.market_id.as_deref());
    list(state.sports.bookmakers(&event_type_id, &market_ids).await)
}

async fn results(
    State(state): State<AppState>,
    Path((event_type_id, kind_str)): Path<(String, String)>,
    Query(params): Query<MarketIdsQuery>,
) -> impl IntoResponse {
    let Some(kind) = ResultKind::from_str(&kind_str) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unknown result kind: {}", kind_str),
            }),
        )
            .into_response();
    };

    let market_ids = parse_market_ids(params.market_id.as_deref());
    debug!("Fetching {:?} results for {} markets", kind, market_ids.len());

    let sports = &state.sports;
    match kind {
        ResultKind::Odds => list(sports.odds_results(&event_type_id, &market_ids).await).into_response(),
        ResultKind::Bookmakers => {
            list(sports.bookmakers_results(&event_type_id, &market_ids).await).into_response()
        }
        ResultKind::Sessions => {
            list(sports.session_results(&event_type_id, &market_ids).await).into_response()
        }
        ResultKind::Fancy => list(sports.fancy_results(&event_type_id, &market_ids).await).into_response(),
    }
}

// ============================================================================
// Match Endpoints
// ============================================================================

async fn match_markets(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
) -> impl IntoResponse {
    list(state.sports.markets(&event_type_id, &match_id).await)
}

async fn match_markets_with_odds(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
) -> impl IntoResponse {
    list(state.sports.markets_with_odds(&event_type_id, &match_id).await)
}

async fn match_bookmakers(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
) -> impl IntoResponse {
    list(state.sports.bookmakers_list(&event_type_id, &match_id).await)
}

async fn match_bookmakers_with_odds(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
) -> impl IntoResponse {
    list(state.sports.bookmakers_with_odds(&event_type_id, &match_id).await)
}

async fn match_sessions(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
    Query(params): Query<SessionsQuery>,
) -> impl IntoResponse {
    let sessions = state
        .sports
        .sessions(&event_type_id, &match_id, params.gtype.as_deref())
        .await;
    list(sessions)
}

async fn match_premium_fancy(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
) -> impl IntoResponse {
    list(state.sports.premium_fancy(&event_type_id, &match_id).await)
}

/// Live score, `null` when the provider has none
async fn match_score(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
) -> impl IntoResponse {
    Json(state.sports.score(&event_type_id, &match_id).await)
}

async fn match_details(
    State(state): State<AppState>,
    Path((event_type_id, match_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("Getting match details: {} in sport {}", match_id, event_type_id);
    Json(state.sports.match_details(&event_type_id, &match_id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get, router, StubUpstream};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_parse_market_ids() {
        assert_eq!(
            parse_market_ids(Some("1.1, 1.2,,")),
            vec![ProviderId::from("1.1"), ProviderId::from("1.2")]
        );
        assert!(parse_market_ids(None).is_empty());
    }

    #[tokio::test]
    async fn test_list_sports() {
        let upstream = Arc::new(
            StubUpstream::default().with("/getSport", json!([{ "eventType": 4, "name": "Cricket" }])),
        );

        let (status, body) = get(router(upstream), "/api/sports").await;

        assert_eq!(status, 200);
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["name"], "Cricket");
        assert_eq!(body["data"][0]["eventType"], 4);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_empty_list() {
        let upstream = Arc::new(StubUpstream::default());

        let (status, body) = get(router(upstream), "/api/sports/4/series").await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({ "data": [], "count": 0 }));
    }

    #[tokio::test]
    async fn test_odds_forward_market_ids() {
        let upstream = Arc::new(
            StubUpstream::default().with("/getMarketsOdds", json!([{ "marketId": "1.1" }, "garbled"])),
        );

        let (status, body) = get(router(upstream.clone()), "/api/sports/4/odds?marketId=1.1,1.2").await;

        assert_eq!(status, 200);
        assert_eq!(body["data"], json!([{ "marketId": "1.1" }, "garbled"]));

        let seen = upstream.seen.lock().unwrap();
        let (path, params) = &seen[0];
        assert_eq!(path, "/getMarketsOdds");
        assert!(params.contains(&("marketId".to_string(), "1.1,1.2".to_string())));
    }

    #[tokio::test]
    async fn test_listing_passes_entries_through() {
        let upstream = Arc::new(StubUpstream::default().with(
            "/getMarkets",
            json!([{ "marketId": "1.1", "marketName": 123 }, "{\"marketId\":\"1.2\"}"]),
        ));

        let (status, body) = get(router(upstream), "/api/sports/4/matches/9/markets").await;

        assert_eq!(status, 200);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["marketName"], 123);
        assert_eq!(body["data"][1], "{\"marketId\":\"1.2\"}");
    }

    #[tokio::test]
    async fn test_unknown_result_kind_is_bad_request() {
        let upstream = Arc::new(StubUpstream::default());

        let (status, body) = get(router(upstream), "/api/sports/4/results/casino?marketId=1").await;

        assert_eq!(status, 400);
        assert_eq!(body["error"], "Unknown result kind: casino");
    }

    #[tokio::test]
    async fn test_score_is_null_without_data() {
        let upstream = Arc::new(StubUpstream::default().with("/score", json!("")));

        let (status, body) = get(router(upstream), "/api/sports/4/matches/1/score").await;

        assert_eq!(status, 200);
        assert_eq!(body, json!(null));
    }

    #[tokio::test]
    async fn test_racing_match_details() {
        let upstream = Arc::new(
            StubUpstream::default()
                .with("/getMarkets", json!([{ "marketId": "1.9", "sr_no": 1 }]))
                .with("/getMarketsOdds", json!([{ "marketId": "1.9" }])),
        );

        let (status, body) = get(router(upstream), "/api/sports/7/matches/55/details").await;

        assert_eq!(status, 200);
        assert_eq!(body["showLay"], false);
        assert_eq!(body["premiumFancy"], json!(null));
        assert_eq!(body["bookmakers"], json!(null));
        assert_eq!(body["sessions"], json!([]));
        assert_eq!(body["matchOdds"][0]["marketId"], "1.9");
        assert_eq!(body["matchOdds"][0]["odds"]["marketId"], "1.9");
    }
}
