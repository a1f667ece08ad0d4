use std::{collections::HashMap, time::Duration};

use alloy::primitives::Address;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Url, header};
use serde::de::DeserializeOwned;

use super::{
    IndexRecordSource,
    types::{BlockInfo, BlockInfoResponse, EventsPage, IndexRecord},
};
use crate::settings::RelayerApiSettings;

/// HTTP client of the bridge relayer indexing service.
///
/// Requests are issued once; retrying is left to the caller.
#[derive(Clone, Debug)]
pub struct RelayerApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RelayerApiClient {
    pub fn new(base_url: Url, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build relayer api http client")?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn from_settings(settings: &RelayerApiSettings) -> Result<Self> {
        Self::new(settings.url.clone(), settings.request_timeout)
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            client,
            base_url: with_trailing_slash(base_url),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("failed to build url for {path}"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let resp = self
            .client
            .get(url.clone())
            .query(query)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("unexpected response from {url}: {status} - {body}"));
        }

        resp.json::<T>()
            .await
            .with_context(|| format!("failed to decode response from {url}"))
    }

    pub async fn get_events(&self, address: Address, chain_id: Option<u64>) -> Result<EventsPage> {
        let url = self.endpoint("events")?;
        let mut query = vec![("address", address.to_string())];
        if let Some(chain_id) = chain_id {
            query.push(("chainID", chain_id.to_string()));
        }
        self.get_json(url, &query).await
    }

    pub async fn get_block_info(&self) -> Result<HashMap<u64, BlockInfo>> {
        let url = self.endpoint("blockInfo")?;
        let resp: BlockInfoResponse = self.get_json(url, &[]).await?;
        Ok(resp
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|info| (info.chain_id, info))
            .collect())
    }
}

#[async_trait]
impl IndexRecordSource for RelayerApiClient {
    async fn events_by_address(
        &self,
        address: Address,
        chain_id: Option<u64>,
    ) -> Result<Vec<IndexRecord>> {
        let page = self.get_events(address, chain_id).await?;
        let records = page.records();
        tracing::debug!(
            %address,
            chain_id,
            items = page.items.len(),
            decoded = records.len(),
            total = page.total,
            "fetched relayer events"
        );
        Ok(records)
    }

    async fn block_info(&self) -> Result<HashMap<u64, BlockInfo>> {
        self.get_block_info().await
    }
}

// `Url::join` drops the last path segment unless the base ends with a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
