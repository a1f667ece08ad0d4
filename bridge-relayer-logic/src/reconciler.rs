use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
    sync::Arc,
};

use alloy::primitives::{Address, B256};
use futures::{StreamExt, TryStreamExt, stream};

use crate::{
    ReconcileError,
    chain_registry::ChainRegistry,
    matcher,
    relayer_api::{BlockInfo, IndexRecordSource},
    settings::ReconcilerSettings,
    status_resolver, token_resolver,
    types::{EnrichedTransaction, MessageStatus},
};

/// Why a record was returned without chain enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::AsRefStr)]
pub enum ProvisionalReason {
    NotMined,
    MissingMessageHash,
    NoMatchingEvent,
    UnknownChain,
}

/// Result of enriching one record. Only transport-level failures escape as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Enriched(EnrichedTransaction),
    Provisional(EnrichedTransaction, ProvisionalReason),
    /// Token-carrying message without a matching vault transfer.
    Dropped { tx_hash: B256, msg_hash: B256 },
}

impl RecordOutcome {
    pub fn into_transaction(self) -> Option<EnrichedTransaction> {
        match self {
            Self::Enriched(tx) | Self::Provisional(tx, _) => Some(tx),
            Self::Dropped { .. } => None,
        }
    }
}

/// Builds the canonical list of bridge transactions of an address by checking
/// what the indexer reports against source and destination chain state.
pub struct TransactionReconciler {
    source: Arc<dyn IndexRecordSource>,
    registry: ChainRegistry,
    settings: ReconcilerSettings,
}

impl TransactionReconciler {
    pub fn new(
        source: Arc<dyn IndexRecordSource>,
        registry: ChainRegistry,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            source,
            registry,
            settings,
        }
    }

    pub async fn reconcile(
        &self,
        address: &str,
        chain_id: Option<u64>,
    ) -> Result<Vec<EnrichedTransaction>, ReconcileError> {
        let address = parse_address(address)?;
        tracing::info!(%address, chain_id, "reconciling bridge transactions");

        let records = self
            .source
            .events_by_address(address, chain_id)
            .await
            .map_err(ReconcileError::RelayerApi)?;
        if records.is_empty() {
            return Ok(vec![]);
        }

        let fetched = records.len();
        let owned: Vec<EnrichedTransaction> = records
            .into_iter()
            .map(EnrichedTransaction::from)
            .filter(|tx| {
                let keep = tx.message.owner == address;
                if !keep {
                    tracing::debug!(
                        tx_hash = %tx.transaction_hash,
                        owner = %tx.message.owner,
                        "skipping record of another owner"
                    );
                }
                keep
            })
            .collect();
        let owned_count = owned.len();
        let unique = dedup_by_message(owned);

        tracing::debug!(
            fetched,
            owned = owned_count,
            unique = unique.len(),
            "normalized relayer records"
        );

        // Completion order is arbitrary; positions restore fetch order afterwards.
        let mut outcomes: Vec<(usize, RecordOutcome)> =
            stream::iter(unique.into_iter().enumerate())
                .map(|(position, tx)| async move {
                    self.enrich(tx).await.map(|outcome| (position, outcome))
                })
                .buffer_unordered(self.settings.max_concurrent_records.max(1))
                .try_collect()
                .await?;
        outcomes.sort_unstable_by_key(|(position, _)| *position);

        let transactions = order_for_display(
            outcomes
                .into_iter()
                .filter_map(|(_, outcome)| outcome.into_transaction())
                .collect(),
        );

        tracing::info!(
            %address,
            count = transactions.len(),
            enriched = transactions.iter().filter(|tx| tx.is_enriched()).count(),
            "reconciled bridge transactions"
        );
        Ok(transactions)
    }

    /// Indexer progress per chain, passed through unchanged.
    pub async fn block_info(&self) -> Result<HashMap<u64, BlockInfo>, ReconcileError> {
        self.source
            .block_info()
            .await
            .map_err(ReconcileError::RelayerApi)
    }

    /// Enriches one record; a chain missing from the registry leaves it provisional.
    pub async fn enrich(&self, tx: EnrichedTransaction) -> Result<RecordOutcome, ReconcileError> {
        let provisional = tx.clone();
        match self.try_enrich(tx).await {
            Err(err) if err.is_record_local() => {
                tracing::warn!(
                    err = %err,
                    tx_hash = %provisional.transaction_hash,
                    "cannot enrich record, returning it as reported"
                );
                Ok(RecordOutcome::Provisional(
                    provisional,
                    ProvisionalReason::UnknownChain,
                ))
            }
            outcome => outcome,
        }
    }

    async fn try_enrich(
        &self,
        mut tx: EnrichedTransaction,
    ) -> Result<RecordOutcome, ReconcileError> {
        let source = self.registry.get(tx.from_chain_id)?;
        let source_chain_id = source.entry.chain_id;
        let reader = source.reader.as_ref();

        let receipt = reader
            .transaction_receipt(tx.transaction_hash)
            .await
            .map_err(|err| ReconcileError::chain_read(source_chain_id, err))?;
        let Some(receipt) = receipt else {
            tracing::debug!(tx_hash = %tx.transaction_hash, "transaction is not mined yet");
            return Ok(RecordOutcome::Provisional(tx, ProvisionalReason::NotMined));
        };
        let block_number = receipt.block_number;
        tx.receipt = Some(receipt);

        let Some(msg_hash) = tx.msg_hash else {
            tracing::debug!(tx_hash = %tx.transaction_hash, "record carries no message hash");
            return Ok(RecordOutcome::Provisional(
                tx,
                ProvisionalReason::MissingMessageHash,
            ));
        };

        let event = matcher::match_in_block(
            reader,
            source.entry.bridge_address,
            block_number,
            tx.message.owner,
            tx.message.deposit_value,
            msg_hash,
        )
        .await
        .map_err(|err| ReconcileError::chain_read(source_chain_id, err))?;
        let Some(event) = event else {
            return Ok(RecordOutcome::Provisional(
                tx,
                ProvisionalReason::NoMatchingEvent,
            ));
        };

        let destination = self.registry.get(tx.to_chain_id)?;
        let status = status_resolver::resolve_status(
            destination.reader.as_ref(),
            destination.entry.bridge_address,
            event.msg_hash,
        )
        .await?;

        let transfer = if event.message.carries_token_transfer() {
            let transfer = token_resolver::resolve_transfer(
                reader,
                source.entry.token_vault_address,
                event.msg_hash,
                block_number,
            )
            .await?;
            match transfer {
                Some(transfer) => Some(transfer),
                None => {
                    tracing::debug!(
                        tx_hash = %tx.transaction_hash,
                        msg_hash = %event.msg_hash,
                        "dropping token message without vault transfer"
                    );
                    return Ok(RecordOutcome::Dropped {
                        tx_hash: tx.transaction_hash,
                        msg_hash: event.msg_hash,
                    });
                }
            }
        } else {
            None
        };

        let (resolved_amount, resolved_symbol) = transfer
            .map(|t| (Some(t.amount), Some(t.symbol)))
            .unwrap_or_default();

        Ok(RecordOutcome::Enriched(EnrichedTransaction {
            message: event.message,
            msg_hash: Some(event.msg_hash),
            destination_status: Some(status),
            resolved_amount,
            resolved_symbol,
            ..tx
        }))
    }
}

fn parse_address(address: &str) -> Result<Address, ReconcileError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ReconcileError::InvalidArgument(
            "address is required to fetch transactions".to_string(),
        ));
    }
    Address::from_str(address)
        .map_err(|e| ReconcileError::InvalidArgument(format!("invalid address {address}: {e}")))
}

/// Keeps the last reported record of every (owner, message hash) pair, in fetch order.
pub fn dedup_by_message(transactions: Vec<EnrichedTransaction>) -> Vec<EnrichedTransaction> {
    let mut seen = HashSet::new();
    let mut kept: Vec<_> = transactions
        .into_iter()
        .rev()
        .filter(|tx| tx.message_key().is_none_or(|key| seen.insert(key)))
        .collect();
    kept.reverse();
    kept
}

/// Latest fetched first, with still-new messages ahead of everything else.
pub fn order_for_display(mut transactions: Vec<EnrichedTransaction>) -> Vec<EnrichedTransaction> {
    transactions.reverse();
    // stable: relative order inside both groups is kept
    transactions.sort_by_key(|tx| tx.status() != Some(MessageStatus::New));
    transactions
}
