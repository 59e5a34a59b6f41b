//! Sports service
//!
//! Fans out to the provider's endpoints, caches the slow-moving listings and
//! assembles the composed views the front-end renders. Every public method is
//! fail-soft: failures are logged and turned into an empty list or `None`.

use futures::future::try_join_all;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sports_core::ordering::{order_sessions, sort_by_sequence};
use sports_core::{
    is_racing_event_type, records, BookmakerMarket, CompetitionItem, Entry, FancyMarket,
    MarketItem, MarketKeyed, MarketWithOdds, MatchDetails, MatchItem, MatchResult, MatchWithOdds,
    Odds, ProviderId, Score, ScoreMatch, SeriesWithMatches, Session, Sport, SportsError,
    SportsResult,
};
use sports_provider::{decode_entries, decode_records, normalize, DecodePolicy, IdBatchPolicy, Upstream};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::cache::Cache;

/// Series listings change rarely (3 hours)
pub const SERIES_TTL: Duration = Duration::from_secs(3 * 60 * 60);
/// Match listings (2 hours)
pub const MATCHES_TTL: Duration = Duration::from_secs(2 * 60 * 60);
/// Market listings (4 hours)
pub const MARKETS_TTL: Duration = Duration::from_secs(4 * 60 * 60);
/// Bookmaker market listings (4 hours)
pub const BOOKMAKERS_TTL: Duration = Duration::from_secs(4 * 60 * 60);

const GET_SPORT: &str = "/getSport";
const GET_MARKETS_ODDS: &str = "/getMarketsOdds";
const GET_BOOKMAKER_ODDS: &str = "/getBookmakerOdds";
const GET_SESSIONS: &str = "/getSessions";
const GET_PREMIUM: &str = "/getPremium";
const SCORE: &str = "/score";
const SCORE_MATCHES: &str = "/matches/list";
const FETCH_DATA: &str = "/fetch_data";
const GET_MARKETS: &str = "/getMarkets";
const GET_BOOKMAKERS: &str = "/getBookmakers";

/// Settled-result endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Odds,
    Bookmakers,
    Sessions,
    Fancy,
}

impl ResultKind {
    pub fn path(&self) -> &'static str {
        match self {
            ResultKind::Odds => "/oddsResults",
            ResultKind::Bookmakers => "/bookmakersResults",
            ResultKind::Sessions => "/sessionsResults",
            ResultKind::Fancy => "/fancy1Results",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "odds" => Some(ResultKind::Odds),
            "bookmakers" => Some(ResultKind::Bookmakers),
            "sessions" => Some(ResultKind::Sessions),
            "fancy" => Some(ResultKind::Fancy),
            _ => None,
        }
    }
}

fn series_key(event_type_id: &str) -> String {
    format!("series:{}", event_type_id)
}

fn matches_key(event_type_id: &str, competition_id: &str) -> String {
    format!("matches:{}:{}", event_type_id, competition_id)
}

fn markets_key(event_type_id: &str, event_id: &str) -> String {
    format!("markets:{}:{}", event_type_id, event_id)
}

fn bookmakers_key(event_type_id: &str, event_id: &str) -> String {
    format!("bookmakers:{}:{}", event_type_id, event_id)
}

/// Log a failed list operation and fall back to an empty list
fn or_empty<T>(operation: &str, result: SportsResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!("{} failed: {}", operation, e);
            Vec::new()
        }
    }
}

/// Records of a listing that can take part in a join; raw elements are
/// skipped
fn joinable<T>(operation: &str, entries: Vec<Entry<T>>) -> Vec<T> {
    let total = entries.len();
    let items = records(entries);
    if items.len() != total {
        debug!("{}: skipped {} non-object entries", operation, total - items.len());
    }
    items
}

/// Market IDs worth sending to an odds endpoint
fn lookup_ids<M: MarketKeyed>(markets: &[M]) -> Vec<ProviderId> {
    markets
        .iter()
        .filter_map(MarketKeyed::market_id)
        .filter(|id| id.is_present())
        .cloned()
        .collect()
}

/// Service for provider lookups and composed sports views
#[derive(Clone)]
pub struct SportsService {
    upstream: Arc<dyn Upstream>,
    cache: Arc<dyn Cache>,
}

impl SportsService {
    /// Create a new sports service
    pub fn new(upstream: Arc<dyn Upstream>, cache: Arc<dyn Cache>) -> Self {
        Self { upstream, cache }
    }

    async fn fetch_list(
        &self,
        path: &str,
        query: &[(&str, String)],
        policy: DecodePolicy,
    ) -> SportsResult<Vec<Value>> {
        let body = self.upstream.get(path, query).await?;
        Ok(normalize(body, policy))
    }

    /// Query a `marketId` endpoint, batching IDs per `batch`. Requests run
    /// concurrently; results come back in request order. One failed request
    /// fails the whole lookup.
    async fn fetch_by_market_ids(
        &self,
        path: &str,
        event_type_id: &str,
        market_ids: &[ProviderId],
        batch: IdBatchPolicy,
        policy: DecodePolicy,
    ) -> SportsResult<Vec<Value>> {
        let requests = batch.id_params(market_ids);
        debug!(
            "Fetching {} for {} market IDs in {} request(s)",
            path,
            market_ids.len(),
            requests.len()
        );

        let chunks = try_join_all(requests.into_iter().map(|ids| async move {
            let query = [("EventTypeID", event_type_id.to_string()), ("marketId", ids)];
            self.fetch_list(path, &query, policy).await
        }))
        .await?;

        Ok(chunks.into_iter().flatten().collect())
    }

    /// Serve a listing from cache, fetching and storing it on a miss
    async fn cached_list<T, F, Fut>(&self, key: String, ttl: Duration, fetch: F) -> SportsResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = SportsResult<Vec<T>>>,
    {
        if let Some(cached) = self.cache.get(&key).await? {
            match serde_json::from_value::<Vec<T>>(cached) {
                Ok(items) => {
                    debug!("Cache hit for {}", key);
                    return Ok(items);
                }
                Err(e) => warn!("Ignoring unreadable cache entry {}: {}", key, e),
            }
        }

        let items = fetch().await?;
        self.cache.set(&key, serde_json::to_value(&items)?, ttl).await?;
        debug!("Cached {} entries under {}", items.len(), key);
        Ok(items)
    }

    // ========================================================================
    // Live Data
    // ========================================================================

    /// List all sports
    #[instrument(skip(self))]
    pub async fn sports(&self) -> Vec<Entry<Sport>> {
        let result = self.fetch_list(GET_SPORT, &[], DecodePolicy::AsIs).await;
        or_empty("getSports", result.map(decode_entries))
    }

    /// Match odds for the given markets, batched 30 IDs per request
    #[instrument(skip(self, market_ids), fields(markets = market_ids.len()))]
    pub async fn odds(&self, event_type_id: &str, market_ids: &[ProviderId]) -> Vec<Entry<Odds>> {
        let result = self
            .fetch_by_market_ids(
                GET_MARKETS_ODDS,
                event_type_id,
                market_ids,
                IdBatchPolicy::BatchAll,
                DecodePolicy::PassThroughOnError,
            )
            .await;
        or_empty("getOdds", result.map(decode_entries))
    }

    /// Bookmaker odds for the given markets, batched 30 IDs per request
    #[instrument(skip(self, market_ids), fields(markets = market_ids.len()))]
    pub async fn bookmaker_odds(
        &self,
        event_type_id: &str,
        market_ids: &[ProviderId],
    ) -> Vec<Entry<Odds>> {
        let result = self
            .fetch_by_market_ids(
                GET_BOOKMAKER_ODDS,
                event_type_id,
                market_ids,
                IdBatchPolicy::BatchAll,
                DecodePolicy::PassThroughOnError,
            )
            .await;
        or_empty("getBookmakerOdds", result.map(decode_entries))
    }

    /// Bookmaker odds for the given markets in a single request
    #[instrument(skip(self, market_ids), fields(markets = market_ids.len()))]
    pub async fn bookmakers(&self, event_type_id: &str, market_ids: &[ProviderId]) -> Vec<Entry<Odds>> {
        let result = self
            .fetch_by_market_ids(
                GET_BOOKMAKER_ODDS,
                event_type_id,
                market_ids,
                IdBatchPolicy::SingleRequest,
                DecodePolicy::AsIs,
            )
            .await;
        or_empty("getBookmakers", result.map(decode_entries))
    }

    /// Session markets for a match, in display order
    #[instrument(skip(self))]
    pub async fn sessions(
        &self,
        event_type_id: &str,
        match_id: &str,
        gtype: Option<&str>,
    ) -> Vec<Session> {
        let mut query = vec![
            ("EventTypeID", event_type_id.to_string()),
            ("matchId", match_id.to_string()),
        ];
        if let Some(g) = gtype.filter(|g| !g.is_empty()) {
            query.push(("gtype", g.to_string()));
        }

        match self.fetch_list(GET_SESSIONS, &query, DecodePolicy::DropOnError).await {
            Ok(values) => {
                let sessions = order_sessions(decode_records(values));
                debug!("Got {} sessions for match {}", sessions.len(), match_id);
                sessions
            }
            Err(e) => {
                debug!("getSessions failed for match {}: {}", match_id, e);
                Vec::new()
            }
        }
    }

    /// Premium fancy markets for a match
    #[instrument(skip(self))]
    pub async fn premium_fancy(
        &self,
        event_type_id: &str,
        match_id: &str,
    ) -> Vec<Entry<FancyMarket>> {
        let query = [
            ("EventTypeID", event_type_id.to_string()),
            ("matchId", match_id.to_string()),
        ];

        match self.fetch_list(GET_PREMIUM, &query, DecodePolicy::AsIs).await {
            Ok(values) => decode_entries(values),
            Err(e) => {
                debug!("getPremiumFancy failed for match {}: {}", match_id, e);
                Vec::new()
            }
        }
    }

    /// Live score for a match, if the provider has one
    #[instrument(skip(self))]
    pub async fn score(&self, event_type_id: &str, match_id: &str) -> Option<Score> {
        let query = [
            ("EventTypeID", event_type_id.to_string()),
            ("matchId", match_id.to_string()),
        ];

        match self.upstream.get(SCORE, &query).await {
            Ok(body) => Score::from_body(body),
            Err(e) => {
                debug!("getScore failed for match {}: {}", match_id, e);
                None
            }
        }
    }

    /// Matches that currently have live scores
    #[instrument(skip(self))]
    pub async fn score_matches(&self, event_type_id: &str) -> Vec<Entry<ScoreMatch>> {
        let query = [("EventTypeID", event_type_id.to_string())];
        let result = self.fetch_list(SCORE_MATCHES, &query, DecodePolicy::AsIs).await;
        or_empty("getScoreMatchesList", result.map(decode_entries))
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Result lookups only ever send the first 30 market IDs
    async fn results<T: DeserializeOwned>(
        &self,
        kind: ResultKind,
        event_type_id: &str,
        market_ids: &[ProviderId],
    ) -> Vec<Entry<T>> {
        let result = self
            .fetch_by_market_ids(
                kind.path(),
                event_type_id,
                market_ids,
                IdBatchPolicy::TruncateTo30,
                DecodePolicy::AsIs,
            )
            .await;
        or_empty(kind.path(), result.map(decode_entries))
    }

    #[instrument(skip(self, market_ids))]
    pub async fn odds_results(
        &self,
        event_type_id: &str,
        market_ids: &[ProviderId],
    ) -> Vec<Entry<Odds>> {
        self.results(ResultKind::Odds, event_type_id, market_ids).await
    }

    #[instrument(skip(self, market_ids))]
    pub async fn bookmakers_results(
        &self,
        event_type_id: &str,
        market_ids: &[ProviderId],
    ) -> Vec<Entry<MatchResult>> {
        self.results(ResultKind::Bookmakers, event_type_id, market_ids).await
    }

    #[instrument(skip(self, market_ids))]
    pub async fn session_results(
        &self,
        event_type_id: &str,
        market_ids: &[ProviderId],
    ) -> Vec<Entry<MatchResult>> {
        self.results(ResultKind::Sessions, event_type_id, market_ids).await
    }

    #[instrument(skip(self, market_ids))]
    pub async fn fancy_results(
        &self,
        event_type_id: &str,
        market_ids: &[ProviderId],
    ) -> Vec<Entry<MatchResult>> {
        self.results(ResultKind::Fancy, event_type_id, market_ids).await
    }

    // ========================================================================
    // Cached Listings
    // ========================================================================

    /// Series (competitions) for a sport
    #[instrument(skip(self))]
    pub async fn series_list(&self, event_type_id: &str) -> Vec<Entry<CompetitionItem>> {
        let result = self
            .cached_list(series_key(event_type_id), SERIES_TTL, || async {
                let query = [
                    ("Action", "listCompetitions".to_string()),
                    ("EventTypeID", event_type_id.to_string()),
                ];
                self.fetch_list(FETCH_DATA, &query, DecodePolicy::AsIs)
                    .await
                    .map(decode_entries)
            })
            .await;
        or_empty("getSeriesList", result)
    }

    /// Matches in a series
    #[instrument(skip(self))]
    pub async fn match_list(
        &self,
        event_type_id: &str,
        competition_id: &str,
    ) -> Vec<Entry<MatchItem>> {
        let key = matches_key(event_type_id, competition_id);
        let result = self
            .cached_list(key, MATCHES_TTL, || async {
                let query = [
                    ("Action", "listEvents".to_string()),
                    ("EventTypeID", event_type_id.to_string()),
                    ("CompetitionID", competition_id.to_string()),
                ];
                self.fetch_list(FETCH_DATA, &query, DecodePolicy::AsIs)
                    .await
                    .map(decode_entries)
            })
            .await;
        or_empty("getMatchList", result)
    }

    /// Markets offered on a match
    #[instrument(skip(self))]
    pub async fn markets(&self, event_type_id: &str, event_id: &str) -> Vec<Entry<MarketItem>> {
        let key = markets_key(event_type_id, event_id);
        let result = self
            .cached_list(key, MARKETS_TTL, || async {
                let query = [
                    ("EventTypeID", event_type_id.to_string()),
                    ("EventID", event_id.to_string()),
                ];
                self.fetch_list(GET_MARKETS, &query, DecodePolicy::AsIs)
                    .await
                    .map(decode_entries)
            })
            .await;
        or_empty("getMarkets", result)
    }

    /// Bookmaker markets offered on a match
    #[instrument(skip(self))]
    pub async fn bookmakers_list(
        &self,
        event_type_id: &str,
        event_id: &str,
    ) -> Vec<Entry<BookmakerMarket>> {
        let key = bookmakers_key(event_type_id, event_id);
        let result = self
            .cached_list(key, BOOKMAKERS_TTL, || async {
                let query = [
                    ("EventTypeID", event_type_id.to_string()),
                    ("EventID", event_id.to_string()),
                ];
                self.fetch_list(GET_BOOKMAKERS, &query, DecodePolicy::AsIs)
                    .await
                    .map(decode_entries)
            })
            .await;
        or_empty("getBookmakersList", result)
    }

    // ========================================================================
    // Composed Views
    // ========================================================================

    /// Markets of a match with their odds, in display order
    #[instrument(skip(self))]
    pub async fn markets_with_odds(
        &self,
        event_type_id: &str,
        event_id: &str,
    ) -> Vec<MarketWithOdds<MarketItem>> {
        let markets = joinable("getMarkets", self.markets(event_type_id, event_id).await);
        if markets.is_empty() {
            return Vec::new();
        }

        let market_ids = lookup_ids(&markets);
        if market_ids.is_empty() {
            return MarketWithOdds::without_odds(markets);
        }

        let odds = self.odds(event_type_id, &market_ids).await;
        let mut joined = MarketWithOdds::join(markets, &odds);
        sort_by_sequence(&mut joined);
        joined
    }

    /// Bookmaker markets of a match with their odds, in provider order
    #[instrument(skip(self))]
    pub async fn bookmakers_with_odds(
        &self,
        event_type_id: &str,
        event_id: &str,
    ) -> Vec<MarketWithOdds<BookmakerMarket>> {
        let markets = joinable(
            "getBookmakersList",
            self.bookmakers_list(event_type_id, event_id).await,
        );
        if markets.is_empty() {
            return Vec::new();
        }

        let market_ids = lookup_ids(&markets);
        if market_ids.is_empty() {
            return MarketWithOdds::without_odds(markets);
        }

        let odds = self.bookmaker_odds(event_type_id, &market_ids).await;
        MarketWithOdds::join(markets, &odds)
    }

    /// Every series of a sport with its matches and their market odds
    #[instrument(skip(self))]
    pub async fn series_with_matches(&self, event_type_id: &str) -> Vec<SeriesWithMatches> {
        let result = self.try_series_with_matches(event_type_id).await;
        or_empty("getSeriesListWithMatches", result)
    }

    /// Entries without a `competition` (or matches without an `event`) fail
    /// the whole tree; a missing ID inside them is passed on as empty.
    async fn try_series_with_matches(
        &self,
        event_type_id: &str,
    ) -> SportsResult<Vec<SeriesWithMatches>> {
        let series_list = self.series_list(event_type_id).await;

        let series_matches = try_join_all(series_list.into_iter().map(|entry| async move {
            let series = entry
                .into_record()
                .ok_or_else(|| SportsError::parse("Series entry is not an object"))?;
            let competition = series
                .competition
                .ok_or_else(|| SportsError::parse("Series entry has no competition"))?;
            let (id, name) = match competition {
                Entry::Record(c) => (c.id, c.name),
                Entry::Raw(_) => (None, None),
            };

            let competition_id = id.as_ref().map(ToString::to_string).unwrap_or_default();
            let matches = self.match_list(event_type_id, &competition_id).await;
            Ok::<_, SportsError>((id, name, matches))
        }))
        .await?;

        try_join_all(series_matches.into_iter().map(|(id, name, matches)| async move {
            let matches = try_join_all(matches.into_iter().map(|entry| async move {
                let mut item = entry
                    .into_record()
                    .ok_or_else(|| SportsError::parse("Match entry is not an object"))?;
                if item.event.is_none() {
                    return Err(SportsError::parse("Match entry has no event"));
                }

                let event_id = item.event_id().map(ToString::to_string).unwrap_or_default();
                let odds = self.markets_with_odds(event_type_id, &event_id).await;
                item.extra.remove("odds");
                Ok::<_, SportsError>(MatchWithOdds { item, odds })
            }))
            .await?;

            Ok::<_, SportsError>(SeriesWithMatches { id, name, matches })
        }))
        .await
    }

    /// Everything the match page shows, fetched concurrently.
    ///
    /// Racing sports have no premium fancy or bookmaker markets, so those
    /// lookups are skipped and reported as absent. Each part degrades on its
    /// own, so the bundle itself never fails.
    #[instrument(skip(self))]
    pub async fn match_details(&self, event_type_id: &str, match_id: &str) -> MatchDetails {
        let racing = is_racing_event_type(event_type_id);

        let premium_fancy = async {
            if racing {
                None
            } else {
                Some(self.premium_fancy(event_type_id, match_id).await)
            }
        };

        let bookmakers = async {
            if racing {
                None
            } else {
                Some(self.bookmakers_with_odds(event_type_id, match_id).await)
            }
        };

        let (match_odds, score, premium_fancy, bookmakers, sessions) = tokio::join!(
            self.markets_with_odds(event_type_id, match_id),
            self.score(event_type_id, match_id),
            premium_fancy,
            bookmakers,
            self.sessions(event_type_id, match_id, None),
        );

        MatchDetails {
            match_odds,
            score,
            premium_fancy,
            bookmakers,
            sessions,
            show_lay: !racing,
        }
    }
}

impl std::fmt::Debug for SportsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SportsService").finish()
    }
}
