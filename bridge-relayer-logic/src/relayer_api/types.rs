use alloy::primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::{
    types::{BridgeMessage, EnrichedTransaction},
    utils::{deserialize_opt_u256, deserialize_payload, deserialize_u256},
};

/// One page of `GET /events`. Items stay undecoded until [`EventsPage::records`]
/// so that one malformed record does not fail the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<Box<RawValue>>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

impl EventsPage {
    /// Decodes every item independently, skipping the ones that do not parse.
    pub fn records(&self) -> Vec<IndexRecord> {
        self.items
            .iter()
            .enumerate()
            .filter_map(
                |(position, item)| match serde_json::from_str::<IndexRecord>(item.get()) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        tracing::warn!(position, err = %err, "skipping undecodable relayer record");
                        None
                    }
                },
            )
            .collect()
    }
}

/// Bridge event as recorded by the indexing service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    pub status: u8,
    #[serde(default)]
    pub event_type: Option<u8>,
    #[serde(default, rename = "chainID")]
    pub chain_id: Option<u64>,
    pub data: IndexRecordData,
    #[serde(default, deserialize_with = "deserialize_opt_u256")]
    pub amount: Option<U256>,
    #[serde(default)]
    pub canonical_token_symbol: Option<String>,
    #[serde(default)]
    pub canonical_token_address: Option<String>,
    #[serde(default)]
    pub canonical_token_name: Option<String>,
    #[serde(default)]
    pub canonical_token_decimals: Option<u8>,
    #[serde(default)]
    pub msg_hash: Option<B256>,
    #[serde(default)]
    pub message_owner: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexRecordData {
    pub message: IndexedMessage,
    pub raw: RawLog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub transaction_hash: B256,
}

/// Message envelope in the indexer encoding (Go field names, big integers
/// as numbers or strings, payload as base64).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexedMessage {
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub id: U256,
    #[serde(default)]
    pub to: Address,
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub data: Bytes,
    #[serde(default)]
    pub memo: String,
    pub owner: Address,
    #[serde(default)]
    pub sender: Address,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub gas_limit: U256,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub call_value: U256,
    #[serde(deserialize_with = "deserialize_u256")]
    pub src_chain_id: U256,
    #[serde(deserialize_with = "deserialize_u256")]
    pub dest_chain_id: U256,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub deposit_value: U256,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub processing_fee: U256,
    #[serde(default)]
    pub refund_address: Address,
}

impl From<IndexedMessage> for BridgeMessage {
    fn from(m: IndexedMessage) -> Self {
        Self {
            id: m.id,
            sender: m.sender,
            src_chain_id: m.src_chain_id,
            dest_chain_id: m.dest_chain_id,
            owner: m.owner,
            to: m.to,
            refund_address: m.refund_address,
            deposit_value: m.deposit_value,
            call_value: m.call_value,
            processing_fee: m.processing_fee,
            gas_limit: m.gas_limit,
            data: m.data,
            memo: m.memo,
        }
    }
}

/// Provisional record: what the indexer says, before any chain state is consulted.
impl From<IndexRecord> for EnrichedTransaction {
    fn from(record: IndexRecord) -> Self {
        let message = BridgeMessage::from(record.data.message);
        Self {
            reported_status: record.status,
            amount: record.amount,
            token_symbol: record.canonical_token_symbol.filter(|s| !s.is_empty()),
            msg_hash: record.msg_hash,
            transaction_hash: record.data.raw.transaction_hash,
            from_chain_id: message.src_chain_id,
            to_chain_id: message.dest_chain_id,
            from_address: message.owner,
            message,
            receipt: None,
            destination_status: None,
            resolved_amount: None,
            resolved_symbol: None,
        }
    }
}

/// Indexer progress for one chain, from `GET /blockInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlockInfo {
    #[serde(rename = "chainID")]
    pub chain_id: u64,
    #[serde(rename = "latestProcessedBlock")]
    pub latest_processed_block: u64,
    #[serde(rename = "latestBlock")]
    pub latest_block: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockInfoResponse {
    #[serde(default)]
    pub data: Option<Vec<BlockInfo>>,
}
