use std::{collections::HashMap, path::Path, sync::Arc};

use alloy::primitives::{Address, U256};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use url::Url;

use crate::{
    ReconcileError,
    chain_reader::{AlloyChainReader, ChainReader},
};

/// One entry of the chains config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    pub chain_id: u64,
    #[serde(default)]
    pub name: String,
    pub rpc_url: Url,
    pub bridge_address: Address,
    pub token_vault_address: Address,
}

/// Load and deserialize chains from a JSON file
pub fn load_chains_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ChainConfig>> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read chains config file: {:?}", path.as_ref()))?;

    let chains: Vec<ChainConfig> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse chains config JSON: {:?}", path.as_ref()))?;

    Ok(chains)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainRegistryEntry {
    pub chain_id: u64,
    pub bridge_address: Address,
    pub token_vault_address: Address,
}

/// Registry entry together with the reader used to query that chain.
#[derive(Clone)]
pub struct RegisteredChain {
    pub entry: ChainRegistryEntry,
    pub reader: Arc<dyn ChainReader>,
}

/// Immutable chain id -> contracts/reader mapping, built once at startup.
#[derive(Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<u64, RegisteredChain>,
}

impl ChainRegistry {
    pub fn builder() -> ChainRegistryBuilder {
        ChainRegistryBuilder::default()
    }

    /// Connects an HTTP JSON-RPC reader for every configured chain.
    pub fn from_configs(configs: &[ChainConfig]) -> Result<Self> {
        configs
            .iter()
            .try_fold(Self::builder(), |builder, config| {
                let entry = ChainRegistryEntry {
                    chain_id: config.chain_id,
                    bridge_address: config.bridge_address,
                    token_vault_address: config.token_vault_address,
                };
                let reader = AlloyChainReader::connect_http(config.chain_id, config.rpc_url.clone());
                builder.with_chain(entry, Arc::new(reader))
            })
            .map(ChainRegistryBuilder::build)
    }

    /// Looks a chain up by the (possibly wider than 64 bits) id carried in a message.
    pub fn get(&self, chain_id: U256) -> Result<&RegisteredChain, ReconcileError> {
        u64::try_from(chain_id)
            .ok()
            .and_then(|id| self.chains.get(&id))
            .ok_or(ReconcileError::UnknownChain(chain_id))
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.chains.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[derive(Default)]
pub struct ChainRegistryBuilder {
    chains: HashMap<u64, RegisteredChain>,
}

impl ChainRegistryBuilder {
    pub fn with_chain(
        mut self,
        entry: ChainRegistryEntry,
        reader: Arc<dyn ChainReader>,
    ) -> Result<Self> {
        if reader.chain_id() != entry.chain_id {
            return Err(anyhow!(
                "reader for chain {} registered under chain {}",
                reader.chain_id(),
                entry.chain_id
            ));
        }
        if self
            .chains
            .insert(entry.chain_id, RegisteredChain { entry, reader })
            .is_some()
        {
            return Err(anyhow!("chain {} is configured twice", entry.chain_id));
        }
        Ok(self)
    }

    pub fn build(self) -> ChainRegistry {
        ChainRegistry {
            chains: self.chains,
        }
    }
}
