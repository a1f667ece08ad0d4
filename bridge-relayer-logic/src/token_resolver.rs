use alloy::primitives::{Address, B256};

use crate::{
    ReconcileError,
    chain_reader::ChainReader,
    matcher::{Selection, select_unique},
    types::ResolvedTransfer,
};

/// Finds the token vault `ERC20Sent` log of `msg_hash` in `block_number` and
/// reads the symbol of the transferred token.
///
/// `Ok(None)` means the message claims a token payload but the vault emitted
/// nothing for it in that block.
pub async fn resolve_transfer(
    source: &dyn ChainReader,
    token_vault: Address,
    msg_hash: B256,
    block_number: u64,
) -> Result<Option<ResolvedTransfer>, ReconcileError> {
    let chain_id = source.chain_id();
    let events = source
        .token_sent_events(token_vault, msg_hash, block_number)
        .await
        .map_err(|err| ReconcileError::chain_read(chain_id, err))?;

    // The topic filter is not trusted to be exact; compare the hash again.
    let event = match select_unique(&events, |event| event.msg_hash == msg_hash) {
        Selection::Unique(event) => event,
        Selection::NotFound => {
            tracing::debug!(
                chain_id,
                block_number,
                %msg_hash,
                candidates = events.len(),
                "no ERC20Sent event for message"
            );
            return Ok(None);
        }
        Selection::Ambiguous(count) => {
            tracing::warn!(
                chain_id,
                block_number,
                %msg_hash,
                count,
                "several ERC20Sent events for message"
            );
            return Ok(None);
        }
    };

    let symbol = source
        .token_symbol(event.token)
        .await
        .map_err(|err| ReconcileError::chain_read(chain_id, err))?;

    Ok(Some(ResolvedTransfer {
        symbol,
        amount: event.amount,
    }))
}
