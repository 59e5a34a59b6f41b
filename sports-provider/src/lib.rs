//! Sports odds provider integration for the Sports Odds Aggregator
//!
//! This crate provides the HTTP client for the provider's REST API, the
//! normalization of its loosely shaped list responses, and the market ID
//! batching rules its endpoints require.

pub mod batch;
pub mod client;
pub mod config;
pub mod normalize;

pub use batch::{IdBatchPolicy, MAX_IDS_PER_REQUEST};
pub use client::{ProviderClient, Query, Upstream};
pub use config::ProviderConfig;
pub use normalize::{decode_entries, decode_records, normalize, DecodePolicy, RawEntry};
