//! Selection of the single on-chain event that corresponds to an indexer record.
//!
//! A block can hold several `MessageSent` emissions from unrelated senders, so a
//! candidate is only accepted when it is the one and only event satisfying every
//! predicate. Zero and several matches are both reported as "no definitive match".

use alloy::primitives::{Address, B256, U256};

use crate::chain_reader::{ChainReader, MessageSentEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    Unique(T),
    NotFound,
    Ambiguous(usize),
}

impl<T> Selection<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Unique(value) => Some(value),
            Self::NotFound | Self::Ambiguous(_) => None,
        }
    }
}

/// Returns the only item satisfying `predicate`.
pub fn select_unique<I, P>(candidates: I, mut predicate: P) -> Selection<I::Item>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    let mut matching = candidates.into_iter().filter(|item| predicate(item));
    match (matching.next(), matching.next()) {
        (None, _) => Selection::NotFound,
        (Some(item), None) => Selection::Unique(item),
        (Some(_), Some(_)) => Selection::Ambiguous(2 + matching.count()),
    }
}

/// Picks the `MessageSent` event emitted for `owner` with the given deposit and hash.
pub fn find_match<'a>(
    events: &'a [MessageSentEvent],
    owner: Address,
    deposit_value: U256,
    msg_hash: B256,
) -> Selection<&'a MessageSentEvent> {
    select_unique(events, |event| {
        event.message.owner == owner
            && event.message.deposit_value == deposit_value
            && event.msg_hash == msg_hash
    })
}

/// Queries the bridge logs of `block_number` and selects the matching event.
pub async fn match_in_block(
    reader: &dyn ChainReader,
    bridge: Address,
    block_number: u64,
    owner: Address,
    deposit_value: U256,
    msg_hash: B256,
) -> anyhow::Result<Option<MessageSentEvent>> {
    let events = reader.message_sent_events(bridge, block_number).await?;

    match find_match(&events, owner, deposit_value, msg_hash) {
        Selection::Unique(event) => Ok(Some(event.clone())),
        Selection::NotFound => {
            tracing::debug!(
                chain_id = reader.chain_id(),
                block_number,
                %msg_hash,
                candidates = events.len(),
                "no MessageSent event matches the record"
            );
            Ok(None)
        }
        Selection::Ambiguous(count) => {
            tracing::warn!(
                chain_id = reader.chain_id(),
                block_number,
                %msg_hash,
                count,
                "several MessageSent events match the record, refusing to pick one"
            );
            Ok(None)
        }
    }
}
