//! Ledger-indexing service client
//!
//! [`ChainIndex`] is the seam the evidence resolver and task engines work
//! against; [`BlockfrostClient`] is the HTTP implementation. Every call
//! carries the API key header and a bounded timeout so a slow lookup for
//! one transaction cannot stall the rest of a user's tasks.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::chain::PlutusValue;
use crate::types::{AssetUnit, PointsError, Result};

/// One input of a transaction, as reported by the ledger index
#[derive(Debug, Clone, Deserialize)]
pub struct TxInput {
    pub address: String,
}

/// One output of a transaction; at most one of the datum fields is set
#[derive(Debug, Clone, Deserialize)]
pub struct TxOutput {
    pub address: String,
    #[serde(default)]
    pub inline_datum: Option<PlutusValue>,
    #[serde(default)]
    pub data_hash: Option<String>,
}

/// Inputs and outputs of one transaction, in ledger-reported order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxUtxos {
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
}

/// One redeemer entry of a transaction
#[derive(Debug, Clone, Deserialize)]
pub struct RedeemerRef {
    pub purpose: String,
    pub script_hash: String,
    #[serde(default)]
    pub redeemer_data_hash: Option<String>,
}

/// Quantity of one asset held at an address; quantities are reported as
/// decimal strings to avoid precision loss
#[derive(Debug, Clone, Deserialize)]
pub struct AssetAmount {
    pub unit: AssetUnit,
    pub quantity: String,
}

#[derive(Debug, Deserialize)]
struct AddressInfo {
    #[serde(default)]
    amount: Vec<AssetAmount>,
}

#[derive(Debug, Deserialize)]
struct DatumEnvelope {
    json_value: PlutusValue,
}

/// Read access to the ledger-indexing service
#[async_trait]
pub trait ChainIndex: Send + Sync {
    /// Inputs and outputs of a transaction
    async fn tx_utxos(&self, tx_hash: &str) -> Result<TxUtxos>;

    /// All redeemers of a transaction
    async fn tx_redeemers(&self, tx_hash: &str) -> Result<Vec<RedeemerRef>>;

    /// Tagged value of a datum or redeemer looked up by its hash
    async fn datum(&self, datum_hash: &str) -> Result<PlutusValue>;

    /// Current asset holdings of an address
    async fn address_assets(&self, address: &str) -> Result<Vec<AssetAmount>>;
}

/// Configuration for the HTTP ledger index client
#[derive(Debug, Clone)]
pub struct BlockfrostConfig {
    /// Base URL including the API version path
    pub base_url: String,
    /// Project API key, sent as the `project_id` header
    pub api_key: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for BlockfrostConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cardano-preprod.blockfrost.io/api/v0".to_string(),
            api_key: String::new(),
            timeout_ms: 30_000,
        }
    }
}

/// HTTP implementation of [`ChainIndex`]
pub struct BlockfrostClient {
    config: BlockfrostConfig,
    http: reqwest::Client,
}

impl BlockfrostClient {
    pub fn new(config: BlockfrostConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, http })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%url, "ledger index GET");
        let response = self
            .http
            .get(&url)
            .header("project_id", &self.config.api_key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PointsError::Ledger(format!(
                "GET {} returned {}",
                path,
                response.status()
            )));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ChainIndex for BlockfrostClient {
    async fn tx_utxos(&self, tx_hash: &str) -> Result<TxUtxos> {
        self.get_json(&format!("/txs/{}/utxos", tx_hash)).await
    }

    async fn tx_redeemers(&self, tx_hash: &str) -> Result<Vec<RedeemerRef>> {
        self.get_json(&format!("/txs/{}/redeemers", tx_hash)).await
    }

    async fn datum(&self, datum_hash: &str) -> Result<PlutusValue> {
        let envelope: DatumEnvelope = self
            .get_json(&format!("/scripts/datum/{}", datum_hash))
            .await?;
        Ok(envelope.json_value)
    }

    async fn address_assets(&self, address: &str) -> Result<Vec<AssetAmount>> {
        let info: AddressInfo = self.get_json(&format!("/addresses/{}", address)).await?;
        Ok(info.amount)
    }
}

/// Index an asset list by unit, parsing quantities to integers.
/// Unparseable quantities are dropped.
pub fn asset_map(assets: &[AssetAmount]) -> HashMap<AssetUnit, i128> {
    assets
        .iter()
        .filter_map(|a| Some((a.unit.clone(), a.quantity.parse::<i128>().ok()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlockfrostConfig::default();
        assert!(config.base_url.contains("preprod"));
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn test_asset_map_drops_unparseable_quantities() {
        let assets = vec![
            AssetAmount {
                unit: "lovelace".to_string(),
                quantity: "1500000".to_string(),
            },
            AssetAmount {
                unit: "bad".to_string(),
                quantity: "not-a-number".to_string(),
            },
        ];
        let map = asset_map(&assets);
        assert_eq!(map.get("lovelace"), Some(&1_500_000));
        assert!(!map.contains_key("bad"));
    }

    #[test]
    fn test_utxos_deserialize_with_optional_datum_fields() {
        let raw = r#"{
            "inputs": [{"address": "addr_wallet", "amount": []}],
            "outputs": [
                {"address": "addr_script", "data_hash": "d1"},
                {"address": "addr_script", "inline_datum": {"int": 5}}
            ]
        }"#;
        let utxos: TxUtxos = serde_json::from_str(raw).expect("deserializes");
        assert_eq!(utxos.inputs.len(), 1);
        assert_eq!(utxos.outputs[0].data_hash.as_deref(), Some("d1"));
        assert!(utxos.outputs[1].inline_datum.is_some());
    }
}
