//! Configuration for the scoring run
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

use crate::ledger::BlockfrostConfig;
use crate::prices::PriceServiceConfig;
use crate::tasks::TaskLimits;

/// Scorekeeper - wallet activity scoring for the token incentive program
#[derive(Parser, Debug, Clone)]
#[command(name = "scorekeeper")]
#[command(about = "Scores wallet activity against the incentive task set")]
pub struct Args {
    /// Cardano network to score against (mainnet, preprod, preview)
    #[arg(long, env = "CARDANO_NET", default_value = "preprod")]
    pub network: String,

    /// Blockfrost project key for the selected network
    #[arg(long, env = "BLOCKFROST_API_KEY")]
    pub blockfrost_api_key: String,

    /// Spot price endpoint
    #[arg(long, env = "PRICE_SPOT_URL")]
    pub price_spot_url: String,

    /// 30-day price history endpoint
    #[arg(long, env = "PRICE_HISTORY_URL")]
    pub price_history_url: String,

    /// Bearer token for the history endpoint (optional)
    #[arg(long, env = "PRICE_HISTORY_TOKEN")]
    pub price_history_token: Option<String>,

    /// HTTP request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Policy id of the governance token
    #[arg(long, env = "GOV_FUND_POLICY")]
    pub gov_fund_policy: String,

    /// Minimum governance tokens bought for a valid registration
    #[arg(long, env = "MIN_REGISTRATION_GOV", default_value = "100")]
    pub min_registration_gov: f64,

    /// Minimum ADA-equivalent deposited for a valid swap offer task
    #[arg(long, env = "MIN_SWAP_ADA", default_value = "500")]
    pub min_swap_ada: f64,

    /// Per-task points cap
    #[arg(long, env = "TASK_MAX_POINTS", default_value = "4000")]
    pub task_max_points: f64,

    /// Upper bound of the governance multiplier
    #[arg(long, env = "MAX_MULTIPLIER", default_value = "1000")]
    pub max_multiplier: f64,

    /// Log level (trace, debug, info, warn, error). The library only emits
    /// `tracing` events; the embedding binary reads this when installing
    /// its subscriber.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Blockfrost base URL for the configured network
    pub fn ledger_base_url(&self) -> String {
        format!(
            "https://cardano-{}.blockfrost.io/api/v0",
            self.network.to_lowercase()
        )
    }

    pub fn blockfrost_config(&self) -> BlockfrostConfig {
        BlockfrostConfig {
            base_url: self.ledger_base_url(),
            api_key: self.blockfrost_api_key.clone(),
            timeout_ms: self.request_timeout_ms,
        }
    }

    pub fn price_config(&self) -> PriceServiceConfig {
        PriceServiceConfig {
            spot_url: self.price_spot_url.clone(),
            history_url: self.price_history_url.clone(),
            history_token: self.price_history_token.clone(),
            timeout_ms: self.request_timeout_ms,
        }
    }

    pub fn limits(&self) -> TaskLimits {
        TaskLimits {
            min_registration_gov: self.min_registration_gov,
            min_swap_ada: self.min_swap_ada,
            max_points: self.task_max_points,
        }
    }

    /// Validate configuration before a run
    pub fn validate(&self) -> Result<(), String> {
        match self.network.to_lowercase().as_str() {
            "mainnet" | "preprod" | "preview" => {}
            other => return Err(format!("unsupported network: {}", other)),
        }
        if self.blockfrost_api_key.is_empty() {
            return Err("BLOCKFROST_API_KEY must not be empty".to_string());
        }
        if self.gov_fund_policy.is_empty() {
            return Err("GOV_FUND_POLICY must not be empty".to_string());
        }
        if self.max_multiplier < 1.0 {
            return Err("MAX_MULTIPLIER must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from([
            "scorekeeper",
            "--blockfrost-api-key",
            "key",
            "--price-spot-url",
            "http://prices/spot",
            "--price-history-url",
            "http://prices/history",
            "--gov-fund-policy",
            "gov_policy",
        ])
    }

    #[test]
    fn test_defaults() {
        let args = base_args();
        assert_eq!(args.network, "preprod");
        assert_eq!(args.request_timeout_ms, 30_000);
        let limits = args.limits();
        assert_eq!(limits.min_registration_gov, 100.0);
        assert_eq!(limits.min_swap_ada, 500.0);
        assert_eq!(limits.max_points, 4_000.0);
        assert_eq!(args.max_multiplier, 1_000.0);
        assert_eq!(args.log_level, "info");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_base_url_follows_network() {
        let mut args = base_args();
        assert_eq!(
            args.ledger_base_url(),
            "https://cardano-preprod.blockfrost.io/api/v0"
        );
        args.network = "Mainnet".to_string();
        assert_eq!(
            args.ledger_base_url(),
            "https://cardano-mainnet.blockfrost.io/api/v0"
        );
    }

    #[test]
    fn test_validate_rejects_unknown_network() {
        let mut args = base_args();
        args.network = "devnet".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_policy() {
        let mut args = base_args();
        args.gov_fund_policy = String::new();
        assert!(args.validate().is_err());
    }
}
