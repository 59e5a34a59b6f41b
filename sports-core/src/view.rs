//! Composed views returned to the front-end

use crate::entry::Entry;
use crate::id::ProviderId;
use crate::market::{BookmakerMarket, FancyMarket, MarketItem, MarketKeyed, Odds, Sequenced};
use crate::session::{Score, Session};
use crate::sport::MatchItem;
use serde::Serialize;
use serde_json::Value;

const ODDS_FIELD: &str = "odds";

/// A market with its odds joined on `marketId`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketWithOdds<M> {
    #[serde(flatten)]
    pub market: M,
    pub odds: Option<Odds>,
}

impl<M: MarketKeyed> MarketWithOdds<M> {
    /// Left-join markets to odds. The first odds record with an equal
    /// `marketId` wins; raw (undecodable) odds entries never match. An
    /// upstream `odds` field on the market is replaced by the joined one.
    pub fn join(markets: Vec<M>, odds: &[Entry<Odds>]) -> Vec<Self> {
        markets
            .into_iter()
            .map(|mut market| {
                market.extra_mut().remove(ODDS_FIELD);
                let odds = odds
                    .iter()
                    .filter_map(Entry::record)
                    .find(|o| o.market_id() == market.market_id())
                    .cloned();
                MarketWithOdds { market, odds }
            })
            .collect()
    }

    pub fn without_odds(markets: Vec<M>) -> Vec<Self> {
        markets
            .into_iter()
            .map(|mut market| {
                market.extra_mut().remove(ODDS_FIELD);
                MarketWithOdds { market, odds: None }
            })
            .collect()
    }
}

impl<M: Sequenced> Sequenced for MarketWithOdds<M> {
    fn sequence(&self) -> f64 {
        self.market.sequence()
    }
}

/// A match listing with its markets and odds attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchWithOdds {
    #[serde(flatten)]
    pub item: MatchItem,
    pub odds: Vec<MarketWithOdds<MarketItem>>,
}

/// A series with every match (and its odds) nested underneath
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesWithMatches {
    pub id: Option<ProviderId>,
    pub name: Option<Value>,
    pub matches: Vec<MatchWithOdds>,
}

/// Everything the match page needs in one response. Fancy and bookmaker
/// markets are absent (`null`) for racing sports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub match_odds: Vec<MarketWithOdds<MarketItem>>,
    pub score: Option<Score>,
    pub premium_fancy: Option<Vec<Entry<FancyMarket>>>,
    pub bookmakers: Option<Vec<MarketWithOdds<BookmakerMarket>>>,
    pub sessions: Vec<Session>,
    pub show_lay: bool,
}
