use alloy::primitives::{Address, B256, Bytes, U256};
use serde::Serialize;
use strum::IntoEnumIterator;

/// Processing status of a bridge message, as tracked by the destination bridge contract.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
pub enum MessageStatus {
    New,
    Retriable,
    Processed,
    Failed,
}

impl MessageStatus {
    pub const fn code(&self) -> u8 {
        match self {
            Self::New => 0,
            Self::Retriable => 1,
            Self::Processed => 2,
            Self::Failed => 3,
        }
    }
}

impl TryFrom<u8> for MessageStatus {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::iter().find(|status| status.code() == code).ok_or(code)
    }
}

/// Bridge message envelope. Built either from the indexer report
/// or from the decoded `MessageSent` log, which is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BridgeMessage {
    pub id: U256,
    pub sender: Address,
    pub src_chain_id: U256,
    pub dest_chain_id: U256,
    pub owner: Address,
    pub to: Address,
    pub refund_address: Address,
    pub deposit_value: U256,
    pub call_value: U256,
    pub processing_fee: U256,
    pub gas_limit: U256,
    pub data: Bytes,
    pub memo: String,
}

impl BridgeMessage {
    /// A non-empty payload means the message carries a token transfer.
    pub fn carries_token_transfer(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Source-chain transaction receipt, reduced to what the reconciliation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub block_hash: Option<B256>,
    pub success: bool,
    pub from: Address,
    pub to: Option<Address>,
}

/// Token movement resolved from the token vault log of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTransfer {
    pub symbol: String,
    /// Raw on-chain amount, not scaled by token decimals.
    pub amount: U256,
}

/// One logical cross-chain message, as returned to the caller.
///
/// Fields up to `from_address` come from the indexer report; the rest are filled
/// in only when the record could be matched against chain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedTransaction {
    pub reported_status: u8,
    pub message: BridgeMessage,
    pub amount: Option<U256>,
    pub token_symbol: Option<String>,
    pub msg_hash: Option<B256>,
    pub transaction_hash: B256,
    pub from_chain_id: U256,
    pub to_chain_id: U256,
    pub from_address: Address,

    pub receipt: Option<SourceReceipt>,
    pub destination_status: Option<MessageStatus>,
    pub resolved_amount: Option<U256>,
    pub resolved_symbol: Option<String>,
}

impl EnrichedTransaction {
    /// Destination status when resolved, otherwise the status reported by the indexer.
    pub fn status(&self) -> Option<MessageStatus> {
        self.destination_status
            .or_else(|| MessageStatus::try_from(self.reported_status).ok())
    }

    pub fn is_enriched(&self) -> bool {
        self.destination_status.is_some()
    }

    /// Deduplication key: one record per owner and message hash.
    pub fn message_key(&self) -> Option<(Address, B256)> {
        self.msg_hash.map(|hash| (self.message.owner, hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(0, MessageStatus::New)]
    #[case(1, MessageStatus::Retriable)]
    #[case(2, MessageStatus::Processed)]
    #[case(3, MessageStatus::Failed)]
    fn status_codes(#[case] code: u8, #[case] status: MessageStatus) {
        assert_eq!(MessageStatus::try_from(code), Ok(status));
        assert_eq!(status.code(), code);
    }

    #[test]
    fn unknown_status_code_is_returned_back() {
        assert_eq!(MessageStatus::try_from(7), Err(7));
    }

    #[test]
    fn status_names() {
        assert_eq!(MessageStatus::Processed.to_string(), "Processed");
        assert_eq!(
            MessageStatus::from_str("Retriable").unwrap(),
            MessageStatus::Retriable
        );
    }
}
