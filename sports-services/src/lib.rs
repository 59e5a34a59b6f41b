//! Business logic services for the Sports Odds Aggregator
//!
//! This crate provides the response cache and the sports service that
//! fans out to the provider, caches listings and composes the views served
//! by the API.

pub mod cache;
pub mod sports_service;

#[cfg(test)]
mod testing;

pub use cache::{Cache, CacheStats, InMemoryCache};
pub use sports_service::{
    ResultKind, SportsService, BOOKMAKERS_TTL, MARKETS_TTL, MATCHES_TTL, SERIES_TTL,
};
