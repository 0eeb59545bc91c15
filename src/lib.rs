//! Scorekeeper - wallet activity scoring for the token incentive program
//!
//! Scores Cardano wallets against a fixed task set (registration, swap
//! offers, fungible-token holding, fund staking) by replaying their
//! on-chain evidence through a Blockfrost-style chain index, pricing it
//! via an external oracle, and rolling the results up into per-user
//! summaries with a governance-token multiplier.
//!
//! ## Modules
//!
//! - **chain**: Plutus datum/redeemer value model and typed decoders
//! - **ledger**: chain index client (transactions, datums, balances)
//! - **prices**: spot and 30-day price oracle with run-scoped caching
//! - **resolver**: per-transaction evidence extraction against validators
//! - **tasks**: the four task engines
//! - **score**: multiplier, per-user rows, and summary rollup

pub mod chain;
pub mod config;
pub mod ledger;
pub mod prices;
pub mod records;
pub mod resolver;
pub mod score;
pub mod tasks;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Args;
pub use types::{PointsError, Result};
