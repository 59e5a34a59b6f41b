//! Market ID batching
//!
//! Some provider endpoints reject long `marketId` lists. Odds lookups are
//! split into chunks and fetched in parallel; results lookups only ever send
//! the first chunk.

use sports_core::ProviderId;

/// Largest number of IDs the provider accepts in one `marketId` parameter
pub const MAX_IDS_PER_REQUEST: usize = 30;

/// How a list of market IDs is turned into requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdBatchPolicy {
    /// One request per chunk of at most 30 IDs, in order
    BatchAll,
    /// One request with the first 30 IDs; the rest are ignored
    TruncateTo30,
    /// One request with every ID
    SingleRequest,
}

impl IdBatchPolicy {
    /// The `marketId` parameter value for each request to issue
    pub fn id_params(&self, ids: &[ProviderId]) -> Vec<String> {
        match self {
            IdBatchPolicy::BatchAll => ids.chunks(MAX_IDS_PER_REQUEST).map(join_ids).collect(),
            IdBatchPolicy::TruncateTo30 => {
                vec![join_ids(&ids[..ids.len().min(MAX_IDS_PER_REQUEST)])]
            }
            IdBatchPolicy::SingleRequest => vec![join_ids(ids)],
        }
    }
}

/// Comma-join IDs for a query parameter
pub fn join_ids(ids: &[ProviderId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
