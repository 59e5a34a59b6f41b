//! Core types for the Sports Odds Aggregator
//!
//! This crate defines the shared data structures used across the aggregator:
//! provider listings (sports, series, matches, markets), live data (odds,
//! sessions, scores), settled results and the composed views served to the
//! betting front-end.

pub mod entry;
pub mod error;
pub mod id;
pub mod market;
pub mod ordering;
pub mod session;
pub mod sport;
pub mod view;

pub use entry::{records, Entry};
pub use error::{SportsError, SportsResult};
pub use id::ProviderId;
pub use market::{
    BookmakerMarket, FancyMarket, MarketItem, MarketKeyed, MatchResult, Odds, Sequenced,
};
pub use session::{Score, Session, SESSION_GTYPE};
pub use sport::{
    is_racing_event_type, Competition, CompetitionItem, MatchEvent, MatchItem, ScoreMatch, Sport,
    RACING_EVENT_TYPE_IDS,
};
pub use view::{MarketWithOdds, MatchDetails, MatchWithOdds, SeriesWithMatches};
