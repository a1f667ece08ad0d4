use alloy::primitives::{Address, B256};

use crate::{ReconcileError, chain_reader::ChainReader, types::MessageStatus};

/// Reads the processing status of `msg_hash` from the destination bridge.
///
/// Always hits the chain: the status moves independently of anything we have seen.
pub async fn resolve_status(
    destination: &dyn ChainReader,
    bridge: Address,
    msg_hash: B256,
) -> Result<MessageStatus, ReconcileError> {
    let chain_id = destination.chain_id();
    let code = destination
        .message_status(bridge, msg_hash)
        .await
        .map_err(|err| ReconcileError::chain_read(chain_id, err))?;

    MessageStatus::try_from(code).map_err(|code| {
        tracing::error!(chain_id, %bridge, %msg_hash, code, "unknown message status code");
        ReconcileError::ProtocolMismatch {
            chain_id,
            bridge,
            code,
        }
    })
}
