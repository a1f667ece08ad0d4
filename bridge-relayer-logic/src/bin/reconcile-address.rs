use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use blockscout_service_launcher::{launcher::ConfigSettings, tracing::init_logs};
use bridge_relayer_logic::{
    ChainRegistry, RelayerApiClient, Settings, TransactionReconciler, load_chains_from_file,
};
use itertools::Itertools;

fn usage() -> &'static str {
    "Usage:\n  reconcile-address <address> [--chain-id <id>]\n\nExamples:\n  reconcile-address 0x79fcdef22feed20eddacbb2587640e45491b757f\n  reconcile-address 0x79fcdef22feed20eddacbb2587640e45491b757f --chain-id 167001\n\nEnv:\n  BRIDGE_RELAYER__CONFIG=path/to/config.toml   (optional)\n  BRIDGE_RELAYER__RELAYER_API__URL=http://...\n  BRIDGE_RELAYER__CHAINS_CONFIG=config/chains.json\n"
}

fn parse_args() -> Result<(String, Option<u64>)> {
    let mut args = std::env::args().skip(1);

    let Some(address) = args.next() else {
        return Err(anyhow!("missing <address>\n\n{}", usage()));
    };
    if matches!(address.as_str(), "-h" | "--help") {
        return Err(anyhow!("{}", usage()));
    }

    let mut chain_id = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chain-id" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow!("--chain-id requires a value\n\n{}", usage()))?;
                chain_id = Some(
                    v.parse::<u64>()
                        .map_err(|_| anyhow!("invalid chain id: {v}\n\n{}", usage()))?,
                );
            }
            "-h" | "--help" => {
                return Err(anyhow!("{}", usage()));
            }
            other => {
                return Err(anyhow!("unknown argument: {other}\n\n{}", usage()));
            }
        }
    }

    Ok((address, chain_id))
}

#[tokio::main]
async fn main() -> Result<()> {
    let (address, chain_id) = parse_args()?;

    let settings = Settings::build().context("failed to read settings")?;
    init_logs("bridge_relayer", &settings.tracing, &settings.jaeger)?;

    let chains = load_chains_from_file(&settings.chains_config)?;
    let registry = ChainRegistry::from_configs(&chains)?;
    tracing::info!(
        chains = %registry.chain_ids().sorted().join(", "),
        relayer = %settings.relayer_api.url,
        "chain registry loaded"
    );

    let source = Arc::new(RelayerApiClient::from_settings(&settings.relayer_api)?);
    let reconciler = TransactionReconciler::new(source, registry, settings.reconciler.clone());

    let block_info = reconciler.block_info().await?;
    for info in block_info.values().sorted_by_key(|info| info.chain_id) {
        println!(
            "chain {:>8}: indexed {} / {}",
            info.chain_id, info.latest_processed_block, info.latest_block
        );
    }

    let transactions = reconciler.reconcile(&address, chain_id).await?;
    if transactions.is_empty() {
        println!("no bridge transactions for {address}");
        return Ok(());
    }

    for tx in &transactions {
        let status = tx
            .status()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("<unknown {}>", tx.reported_status));
        let msg_hash = tx
            .msg_hash
            .map(|h| h.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        let token = match (&tx.resolved_symbol, tx.resolved_amount) {
            (Some(symbol), Some(amount)) => format!("{amount} {symbol}"),
            _ => format!("{} wei", tx.message.deposit_value),
        };
        println!(
            "{} {} -> {} {:<10} {} {}{}",
            tx.transaction_hash,
            tx.from_chain_id,
            tx.to_chain_id,
            status,
            msg_hash,
            token,
            if tx.is_enriched() { "" } else { " (unconfirmed)" },
        );
    }

    Ok(())
}
