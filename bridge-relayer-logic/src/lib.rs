pub mod chain_reader;
mod chain_registry;
mod error;
pub mod matcher;
mod reconciler;
pub mod relayer_api;
pub mod settings;
pub mod status_resolver;
#[cfg(test)]
pub mod test_utils;
pub mod token_resolver;
pub mod types;
pub mod utils;

pub use chain_reader::{AlloyChainReader, ChainReader};
pub use chain_registry::{
    ChainConfig, ChainRegistry, ChainRegistryBuilder, ChainRegistryEntry, RegisteredChain,
    load_chains_from_file,
};
pub use error::ReconcileError;
pub use reconciler::{
    ProvisionalReason, RecordOutcome, TransactionReconciler, dedup_by_message, order_for_display,
};
pub use relayer_api::{BlockInfo, IndexRecord, IndexRecordSource, RelayerApiClient};
pub use settings::{ReconcilerSettings, RelayerApiSettings, Settings};
pub use types::{BridgeMessage, EnrichedTransaction, MessageStatus, ResolvedTransfer, SourceReceipt};
