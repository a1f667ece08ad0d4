use alloy::{
    network::Ethereum,
    primitives::{Address, B256},
    providers::{DynProvider, Provider as _, ProviderBuilder},
    transports::http::reqwest::Url,
};
use anyhow::Context;
use async_trait::async_trait;

use super::{
    ChainReader, MessageSentEvent, TokenSentEvent,
    abi::{IBridge, IERC20, ITokenVault},
};
use crate::types::SourceReceipt;

/// [`ChainReader`] over a JSON-RPC provider.
#[derive(Clone, Debug)]
pub struct AlloyChainReader {
    chain_id: u64,
    provider: DynProvider<Ethereum>,
}

impl AlloyChainReader {
    pub fn new(chain_id: u64, provider: DynProvider<Ethereum>) -> Self {
        Self { chain_id, provider }
    }

    pub fn connect_http(chain_id: u64, rpc_url: Url) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        Self::new(chain_id, provider)
    }
}

#[async_trait]
impl ChainReader for AlloyChainReader {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> anyhow::Result<Option<SourceReceipt>> {
        let Some(receipt) = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .with_context(|| format!("failed to fetch receipt of {tx_hash}"))?
        else {
            return Ok(None);
        };

        // A receipt without a block is not mined yet.
        let Some(block_number) = receipt.block_number else {
            return Ok(None);
        };

        Ok(Some(SourceReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number,
            block_hash: receipt.block_hash,
            success: receipt.status(),
            from: receipt.from,
            to: receipt.to,
        }))
    }

    async fn message_sent_events(
        &self,
        bridge: Address,
        block_number: u64,
    ) -> anyhow::Result<Vec<MessageSentEvent>> {
        let contract = IBridge::new(bridge, self.provider.clone());
        let logs = contract
            .MessageSent_filter()
            .from_block(block_number)
            .to_block(block_number)
            .query()
            .await
            .with_context(|| format!("failed to query MessageSent logs at block {block_number}"))?;

        Ok(logs
            .into_iter()
            .map(|(event, log)| MessageSentEvent {
                msg_hash: event.msgHash,
                message: event.message.into(),
                block_number: log.block_number.unwrap_or(block_number),
            })
            .collect())
    }

    async fn token_sent_events(
        &self,
        token_vault: Address,
        msg_hash: B256,
        block_number: u64,
    ) -> anyhow::Result<Vec<TokenSentEvent>> {
        let contract = ITokenVault::new(token_vault, self.provider.clone());
        let logs = contract
            .ERC20Sent_filter()
            .topic1(msg_hash)
            .from_block(block_number)
            .to_block(block_number)
            .query()
            .await
            .with_context(|| format!("failed to query ERC20Sent logs at block {block_number}"))?;

        Ok(logs
            .into_iter()
            .map(|(event, _)| TokenSentEvent {
                msg_hash: event.msgHash,
                token: event.token,
                amount: event.amount,
            })
            .collect())
    }

    async fn message_status(&self, bridge: Address, msg_hash: B256) -> anyhow::Result<u8> {
        IBridge::new(bridge, self.provider.clone())
            .getMessageStatus(msg_hash)
            .call()
            .await
            .with_context(|| format!("getMessageStatus({msg_hash}) call failed"))
    }

    async fn token_symbol(&self, token: Address) -> anyhow::Result<String> {
        IERC20::new(token, self.provider.clone())
            .symbol()
            .call()
            .await
            .with_context(|| format!("symbol() call on {token} failed"))
    }
}
