use alloy::primitives::{Address, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("chain {0} is not present in the chain registry")]
    UnknownChain(U256),
    #[error("bridge {bridge} on chain {chain_id} returned unknown message status code {code}")]
    ProtocolMismatch {
        chain_id: u64,
        bridge: Address,
        code: u8,
    },
    #[error("relayer api request failed: {0:#}")]
    RelayerApi(#[source] anyhow::Error),
    #[error("chain {chain_id} read failed: {source:#}")]
    ChainRead {
        chain_id: u64,
        #[source]
        source: anyhow::Error,
    },
}

impl ReconcileError {
    pub fn chain_read(chain_id: u64, source: anyhow::Error) -> Self {
        Self::ChainRead { chain_id, source }
    }

    /// Errors that only affect a single record and degrade it instead of failing the batch.
    pub fn is_record_local(&self) -> bool {
        matches!(self, Self::UnknownChain(_))
    }
}
