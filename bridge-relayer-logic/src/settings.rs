use std::{path::PathBuf, time::Duration};

use blockscout_service_launcher::{
    launcher::ConfigSettings,
    tracing::{JaegerSettings, TracingSettings},
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub relayer_api: RelayerApiSettings,
    pub chains_config: PathBuf,

    #[serde(default)]
    pub reconciler: ReconcilerSettings,
    #[serde(default)]
    pub tracing: TracingSettings,
    #[serde(default)]
    pub jaeger: JaegerSettings,
}

impl ConfigSettings for Settings {
    const SERVICE_NAME: &'static str = "BRIDGE_RELAYER";

    fn validate(&self) -> anyhow::Result<()> {
        self.reconciler.validate()
    }
}

impl Settings {
    pub fn default(relayer_url: Url) -> Self {
        Self {
            relayer_api: RelayerApiSettings {
                url: relayer_url,
                request_timeout: default_request_timeout(),
            },
            chains_config: PathBuf::from("config/chains.json"),
            reconciler: Default::default(),
            tracing: Default::default(),
            jaeger: Default::default(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RelayerApiSettings {
    pub url: Url,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub request_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcilerSettings {
    // Upper bound of records enriched at the same time.
    pub max_concurrent_records: usize,
}

impl ReconcilerSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_concurrent_records == 0 {
            anyhow::bail!("reconciler.max_concurrent_records must be positive");
        }
        Ok(())
    }
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            max_concurrent_records: 32,
        }
    }
}
