mod mock_chain_reader;

use std::{collections::HashMap, sync::Arc};

use alloy::primitives::{Address, B256, Bytes, U256};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::RwLock;

pub use mock_chain_reader::{CallCounts, MockChainReader};

use crate::relayer_api::{
    BlockInfo, IndexRecord, IndexRecordSource,
    types::{IndexRecordData, IndexedMessage, RawLog},
};

/// Indexer stub returning a fixed list of records.
#[derive(Clone, Default)]
pub struct MockIndexSource {
    records: Arc<RwLock<Vec<IndexRecord>>>,
    block_info: Arc<RwLock<HashMap<u64, BlockInfo>>>,
    should_fail: Arc<RwLock<bool>>,
    requests: Arc<RwLock<Vec<(Address, Option<u64>)>>>,
}

impl MockIndexSource {
    pub fn new(records: Vec<IndexRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Default::default()
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write() = fail;
    }

    pub fn set_block_info(&self, infos: Vec<BlockInfo>) {
        *self.block_info.write() = infos.into_iter().map(|i| (i.chain_id, i)).collect();
    }

    pub fn requests(&self) -> Vec<(Address, Option<u64>)> {
        self.requests.read().clone()
    }
}

#[async_trait]
impl IndexRecordSource for MockIndexSource {
    async fn events_by_address(
        &self,
        address: Address,
        chain_id: Option<u64>,
    ) -> Result<Vec<IndexRecord>> {
        self.requests.write().push((address, chain_id));
        if *self.should_fail.read() {
            return Err(anyhow!("Mock index source configured to fail"));
        }
        Ok(self.records.read().clone())
    }

    async fn block_info(&self) -> Result<HashMap<u64, BlockInfo>> {
        if *self.should_fail.read() {
            return Err(anyhow!("Mock index source configured to fail"));
        }
        Ok(self.block_info.read().clone())
    }
}

/// Index record with the fields the reconciliation looks at; the rest is empty.
pub fn index_record(
    owner: Address,
    src_chain_id: u64,
    dest_chain_id: u64,
    deposit_value: u64,
    msg_hash: Option<B256>,
    tx_hash: B256,
    data: Bytes,
) -> IndexRecord {
    IndexRecord {
        id: None,
        name: Some("MessageSent".to_string()),
        status: 0,
        event_type: None,
        chain_id: Some(src_chain_id),
        data: IndexRecordData {
            message: IndexedMessage {
                id: U256::ZERO,
                to: owner,
                data,
                memo: String::new(),
                owner,
                sender: Address::ZERO,
                gas_limit: U256::from(140_000u64),
                call_value: U256::ZERO,
                src_chain_id: U256::from(src_chain_id),
                dest_chain_id: U256::from(dest_chain_id),
                deposit_value: U256::from(deposit_value),
                processing_fee: U256::ZERO,
                refund_address: owner,
            },
            raw: RawLog {
                transaction_hash: tx_hash,
            },
        },
        amount: None,
        canonical_token_symbol: None,
        canonical_token_address: None,
        canonical_token_name: None,
        canonical_token_decimals: None,
        msg_hash,
        message_owner: None,
    }
}

pub fn init_tests_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
