use std::{collections::HashMap, sync::Arc};

use alloy::primitives::{Address, B256, U256};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;

use crate::{
    chain_reader::{ChainReader, MessageSentEvent, TokenSentEvent},
    types::SourceReceipt,
};

/// Number of calls per reader method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub transaction_receipt: usize,
    pub message_sent_events: usize,
    pub token_sent_events: usize,
    pub message_status: usize,
    pub token_symbol: usize,
}

#[derive(Default)]
struct State {
    should_fail: bool,
    receipts: HashMap<B256, SourceReceipt>,
    receipt_gates: HashMap<B256, Arc<Notify>>,
    receipt_requests: Vec<B256>,
    message_sent: HashMap<(Address, u64), Vec<MessageSentEvent>>,
    token_sent: HashMap<(Address, u64), Vec<TokenSentEvent>>,
    statuses: HashMap<B256, u8>,
    symbols: HashMap<Address, String>,
    calls: CallCounts,
}

/// In-memory chain for tests.
/// Log queries return everything registered for the (contract, block) pair.
#[derive(Clone)]
pub struct MockChainReader {
    chain_id: u64,
    state: Arc<RwLock<State>>,
}

impl MockChainReader {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    /// Set whether every read should fail as a transport error would.
    pub fn set_should_fail(&self, fail: bool) {
        self.state.write().should_fail = fail;
    }

    pub fn add_receipt(&self, tx_hash: B256, block_number: u64) {
        let receipt = SourceReceipt {
            transaction_hash: tx_hash,
            block_number,
            block_hash: Some(B256::from(U256::from(block_number))),
            success: true,
            from: Address::ZERO,
            to: None,
        };
        self.state.write().receipts.insert(tx_hash, receipt);
    }

    /// Makes the receipt lookup of `tx_hash` wait until `gate` is notified.
    pub fn hold_receipt(&self, tx_hash: B256, gate: Arc<Notify>) {
        self.state.write().receipt_gates.insert(tx_hash, gate);
    }

    /// Transaction hashes whose receipt was requested, in request order.
    pub fn receipt_requests(&self) -> Vec<B256> {
        self.state.read().receipt_requests.clone()
    }

    pub fn add_message_sent_events(
        &self,
        bridge: Address,
        block_number: u64,
        events: Vec<MessageSentEvent>,
    ) {
        self.state
            .write()
            .message_sent
            .entry((bridge, block_number))
            .or_default()
            .extend(events);
    }

    pub fn add_token_sent_events(
        &self,
        token_vault: Address,
        block_number: u64,
        events: Vec<TokenSentEvent>,
    ) {
        self.state
            .write()
            .token_sent
            .entry((token_vault, block_number))
            .or_default()
            .extend(events);
    }

    pub fn set_message_status(&self, msg_hash: B256, code: u8) {
        self.state.write().statuses.insert(msg_hash, code);
    }

    pub fn set_token_symbol(&self, token: Address, symbol: &str) {
        self.state
            .write()
            .symbols
            .insert(token, symbol.to_string());
    }

    pub fn calls(&self) -> CallCounts {
        self.state.read().calls
    }

    fn record<F: FnOnce(&mut CallCounts)>(&self, f: F) -> Result<()> {
        let mut state = self.state.write();
        f(&mut state.calls);
        if state.should_fail {
            Err(anyhow!("Mock chain reader configured to fail"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<SourceReceipt>> {
        let gate = {
            let mut state = self.state.write();
            state.receipt_requests.push(tx_hash);
            state.receipt_gates.get(&tx_hash).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record(|c| c.transaction_receipt += 1)?;
        Ok(self.state.read().receipts.get(&tx_hash).cloned())
    }

    async fn message_sent_events(
        &self,
        bridge: Address,
        block_number: u64,
    ) -> Result<Vec<MessageSentEvent>> {
        self.record(|c| c.message_sent_events += 1)?;
        Ok(self
            .state
            .read()
            .message_sent
            .get(&(bridge, block_number))
            .cloned()
            .unwrap_or_default())
    }

    async fn token_sent_events(
        &self,
        token_vault: Address,
        _msg_hash: B256,
        block_number: u64,
    ) -> Result<Vec<TokenSentEvent>> {
        self.record(|c| c.token_sent_events += 1)?;
        Ok(self
            .state
            .read()
            .token_sent
            .get(&(token_vault, block_number))
            .cloned()
            .unwrap_or_default())
    }

    async fn message_status(&self, _bridge: Address, msg_hash: B256) -> Result<u8> {
        self.record(|c| c.message_status += 1)?;
        self.state
            .read()
            .statuses
            .get(&msg_hash)
            .copied()
            .ok_or_else(|| anyhow!("execution reverted: unknown message {msg_hash}"))
    }

    async fn token_symbol(&self, token: Address) -> Result<String> {
        self.record(|c| c.token_symbol += 1)?;
        self.state
            .read()
            .symbols
            .get(&token)
            .cloned()
            .ok_or_else(|| anyhow!("execution reverted: {token} is not a token"))
    }
}
