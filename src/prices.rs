//! Price oracle
//!
//! Converts a token unit (policy + hex name) into its micro-ADA price and
//! serves a trailing 30-day history. Spot prices are cached for the life
//! of the process; prices are treated as immutable within one run, so a
//! racing cache miss that fetches the same unit twice is tolerable and the
//! last write wins. The history cache is valid only while its most recent
//! entry is dated today (UTC); anything else triggers a full refetch.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{AssetUnit, PointsError, Result, LOVELACE, POLICY_HEX_LEN};

/// Number of entries a valid price history carries
pub const HISTORY_DAYS: usize = 30;

/// Micro-ADA price of the base unit itself
const LOVELACE_PRICE: i64 = 1_000_000;

/// One day of price history, micro-ADA per whole token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    #[serde(rename = "priceADAx1e6")]
    pub price_ada_x1e6: i64,
}

/// External price service boundary
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current micro-ADA price of one whole token
    async fn spot(&self, policy: &str, name_hex: &str) -> Result<i64>;

    /// Trailing daily price history, most recent last
    async fn history(&self, policy: &str, name_hex: &str) -> Result<Vec<PricePoint>>;
}

/// Configuration for the HTTP price source
#[derive(Debug, Clone)]
pub struct PriceServiceConfig {
    /// Endpoint returning `{"priceADAx1e6": "<integer>"}`
    pub spot_url: String,
    /// Endpoint returning `{"prices": [{date, priceADAx1e6}, ..]}`
    pub history_url: String,
    /// Bearer token for the history endpoint
    pub history_token: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for PriceServiceConfig {
    fn default() -> Self {
        Self {
            spot_url: String::new(),
            history_url: String::new(),
            history_token: None,
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpotResponse {
    #[serde(rename = "priceADAx1e6")]
    price_ada_x1e6: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    prices: Vec<PricePoint>,
}

/// HTTP implementation of [`PriceSource`]
pub struct HttpPriceSource {
    config: PriceServiceConfig,
    http: reqwest::Client,
}

impl HttpPriceSource {
    pub fn new(config: PriceServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn spot(&self, policy: &str, name_hex: &str) -> Result<i64> {
        let response = self
            .http
            .get(&self.config.spot_url)
            .query(&[("CS", policy), ("TN_Hex", name_hex), ("validityMS", "100000")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PointsError::Price(format!(
                "spot price request for {}{} returned {}",
                policy,
                name_hex,
                response.status()
            )));
        }
        let body: SpotResponse = response.json().await?;
        body.price_ada_x1e6
            .parse::<i64>()
            .map_err(|_| PointsError::Price(format!("non-integer price: {}", body.price_ada_x1e6)))
    }

    async fn history(&self, policy: &str, name_hex: &str) -> Result<Vec<PricePoint>> {
        let mut request = self
            .http
            .get(&self.config.history_url)
            .query(&[("CS", policy), ("TN_Hex", name_hex), ("days", "30")]);
        if let Some(token) = &self.config.history_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(PointsError::Price(format!(
                "price history request for {}{} returned {}",
                policy,
                name_hex,
                response.status()
            )));
        }
        let body: HistoryResponse = response.json().await?;
        Ok(body.prices)
    }
}

/// Split a unit string into its policy and token-name components
pub fn split_unit(unit: &str) -> (&str, &str) {
    if unit.len() > POLICY_HEX_LEN {
        unit.split_at(POLICY_HEX_LEN)
    } else {
        (unit, "")
    }
}

/// Run-scoped price cache over a [`PriceSource`]
pub struct PriceOracle<S: PriceSource> {
    source: S,
    spot: DashMap<AssetUnit, i64>,
    history: DashMap<AssetUnit, Vec<PricePoint>>,
}

impl<S: PriceSource> PriceOracle<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            spot: DashMap::new(),
            history: DashMap::new(),
        }
    }

    /// Current micro-ADA price of one whole token of `unit`.
    ///
    /// The base unit short-circuits to a fixed price and is never cached
    /// or fetched; everything else is fetched once per run.
    pub async fn price_in_lovelace(&self, unit: &str) -> Result<i64> {
        if unit == LOVELACE {
            return Ok(LOVELACE_PRICE);
        }
        if let Some(price) = self.spot.get(unit) {
            return Ok(*price);
        }
        let (policy, name_hex) = split_unit(unit);
        let price = self.source.spot(policy, name_hex).await?;
        debug!(unit, price, "spot price fetched");
        self.spot.insert(unit.to_string(), price);
        Ok(price)
    }

    /// Trailing 30-day price history of `unit`, most recent entry last
    pub async fn price_history(&self, unit: &str) -> Result<Vec<PricePoint>> {
        self.price_history_at(unit, Utc::now().date_naive()).await
    }

    pub(crate) async fn price_history_at(
        &self,
        unit: &str,
        today: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        if let Some(cached) = self.history.get(unit) {
            if cached.last().map(|p| p.date) == Some(today) {
                return Ok(cached.clone());
            }
        }
        let (policy, name_hex) = split_unit(unit);
        let series = self.source.history(policy, name_hex).await?;
        if series.len() != HISTORY_DAYS {
            return Err(PointsError::Price(format!(
                "expected {} history entries for {}, got {}",
                HISTORY_DAYS,
                unit,
                series.len()
            )));
        }
        debug!(unit, "price history refreshed");
        self.history.insert(unit.to_string(), series.clone());
        Ok(series)
    }
}
