pub mod abi;
mod alloy_reader;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::types::{BridgeMessage, SourceReceipt};

pub use alloy_reader::AlloyChainReader;

/// Decoded `MessageSent` log of a bridge contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSentEvent {
    pub msg_hash: B256,
    pub message: BridgeMessage,
    pub block_number: u64,
}

/// Decoded `ERC20Sent` log of a token vault contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSentEvent {
    pub msg_hash: B256,
    pub token: Address,
    pub amount: U256,
}

/// Read-only access to one chain.
///
/// Log queries always cover the single block `[block_number, block_number]`.
#[async_trait]
pub trait ChainReader: Send + Sync {
    fn chain_id(&self) -> u64;

    /// `None` while the transaction is not mined or unknown to the node.
    async fn transaction_receipt(&self, tx_hash: B256) -> anyhow::Result<Option<SourceReceipt>>;

    async fn message_sent_events(
        &self,
        bridge: Address,
        block_number: u64,
    ) -> anyhow::Result<Vec<MessageSentEvent>>;

    /// `ERC20Sent` logs filtered by the indexed message hash topic.
    async fn token_sent_events(
        &self,
        token_vault: Address,
        msg_hash: B256,
        block_number: u64,
    ) -> anyhow::Result<Vec<TokenSentEvent>>;

    /// Raw status code stored by the bridge for `msg_hash`.
    async fn message_status(&self, bridge: Address, msg_hash: B256) -> anyhow::Result<u8>;

    async fn token_symbol(&self, token: Address) -> anyhow::Result<String>;
}
