//! Market, odds and result data structures

use crate::id::{numeric_or_zero, ProviderId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Anything that can be joined on `marketId`
pub trait MarketKeyed {
    fn market_id(&self) -> Option<&ProviderId>;

    /// Upstream fields without a typed slot
    fn extra_mut(&mut self) -> &mut Map<String, Value>;
}

/// Anything carrying a display sequence number (`sr_no`)
pub trait Sequenced {
    fn sequence(&self) -> f64;
}

/// A market listed for a match (`getMarkets`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketItem {
    #[serde(rename = "marketId", default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<ProviderId>,

    #[serde(rename = "marketName", default, skip_serializing_if = "Option::is_none")]
    pub market_name: Option<Value>,

    /// Display order, number or numeric string as sent by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr_no: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A bookmaker market listed for a match (`getBookmakers`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmakerMarket {
    #[serde(rename = "marketId", default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<ProviderId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr_no: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Live odds for one market (match odds and bookmaker odds share the shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    #[serde(rename = "marketId", default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<ProviderId>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A premium fancy market (`getPremium`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FancyMarket {
    #[serde(rename = "marketId", default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<ProviderId>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A settled result row from one of the results endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "marketId", default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<ProviderId>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

macro_rules! impl_market_keyed {
    ($($ty:ty),*) => {
        $(
            impl MarketKeyed for $ty {
                fn market_id(&self) -> Option<&ProviderId> {
                    self.market_id.as_ref()
                }

                fn extra_mut(&mut self) -> &mut Map<String, Value> {
                    &mut self.extra
                }
            }
        )*
    };
}

impl_market_keyed!(MarketItem, BookmakerMarket, Odds, FancyMarket, MatchResult);

impl Sequenced for MarketItem {
    fn sequence(&self) -> f64 {
        numeric_or_zero(self.sr_no.as_ref())
    }
}

impl Sequenced for BookmakerMarket {
    fn sequence(&self) -> f64 {
        numeric_or_zero(self.sr_no.as_ref())
    }
}
