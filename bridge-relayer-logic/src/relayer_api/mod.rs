mod client;
pub mod types;

use std::collections::HashMap;

use alloy::primitives::Address;
use async_trait::async_trait;

pub use client::RelayerApiClient;
pub use types::{BlockInfo, EventsPage, IndexRecord};

/// Source of bridge events reported by an off-chain indexer.
#[async_trait]
pub trait IndexRecordSource: Send + Sync {
    /// Returns a single page of events for `address`, optionally narrowed to one chain.
    /// An empty result is not an error.
    async fn events_by_address(
        &self,
        address: Address,
        chain_id: Option<u64>,
    ) -> anyhow::Result<Vec<IndexRecord>>;

    /// Last block seen by the indexer on every chain it follows.
    async fn block_info(&self) -> anyhow::Result<HashMap<u64, BlockInfo>>;
}
