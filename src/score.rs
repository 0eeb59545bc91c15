//! Score aggregation
//!
//! Applies the governance-token multiplier to each task's points, rolls
//! task rows up into per-user summaries, and classifies tasks as completed
//! or incomplete. Invalid rows keep their raw points and amounts for
//! display but never contribute to the summed final total; a task with no
//! row at all is also incomplete.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::ledger::ChainIndex;
use crate::tasks::{TaskKind, TaskResult};
use crate::types::{PaymentKeyHash, UNIT_SCALE};

/// Hex token name of the governance token
pub const GOV_TOKEN_NAME_HEX: &str = "674d41595a";

/// Per-user multiplier: the governance holding clamped to `[1, max]`,
/// with 1 for a zero or negative holding
pub fn multiplier(gov_held: f64, max_multiplier: f64) -> f64 {
    if gov_held > 0.0 {
        gov_held.min(max_multiplier).max(1.0)
    } else {
        1.0
    }
}

/// Governance tokens currently held by a wallet, in whole tokens.
/// A missing asset or a failed balance lookup counts as zero.
pub async fn governance_held<C: ChainIndex>(chain: &C, address: &str, gov_policy: &str) -> f64 {
    let unit = format!("{}{}", gov_policy, GOV_TOKEN_NAME_HEX);
    match chain.address_assets(address).await {
        Ok(assets) => assets
            .iter()
            .find(|a| a.unit == unit)
            .and_then(|a| a.quantity.parse::<i128>().ok())
            .map(|q| q as f64 / UNIT_SCALE)
            .unwrap_or(0.0),
        Err(err) => {
            warn!(address, "governance balance fetch failed, assuming zero: {}", err);
            0.0
        }
    }
}

/// Identity fields of one scored user, pre-abbreviated for output
#[derive(Debug, Clone, Serialize)]
pub struct UserIdentity {
    pub payment_pkh: PaymentKeyHash,
    pub stake_pkh: String,
    pub address: String,
}

impl UserIdentity {
    pub fn new(payment_pkh: &str, stake_pkh: &str, address: &str) -> Self {
        Self {
            payment_pkh: short_key(payment_pkh),
            stake_pkh: short_key(stake_pkh),
            address: short_address(address),
        }
    }
}

/// One task row of the program output
#[derive(Debug, Clone, Serialize)]
pub struct UserTaskPoints {
    pub date: String,
    #[serde(flatten)]
    pub identity: UserIdentity,
    pub gov_held: f64,
    pub multiplier: f64,
    pub task: TaskKind,
    pub amount: f64,
    pub current_amount: f64,
    pub points: f64,
    pub is_valid: bool,
    pub final_points: f64,
}

impl UserTaskPoints {
    pub fn from_result(
        identity: UserIdentity,
        gov_held: f64,
        user_multiplier: f64,
        task: TaskKind,
        result: &TaskResult,
    ) -> Self {
        Self {
            date: run_date(),
            identity,
            gov_held,
            multiplier: user_multiplier,
            task,
            amount: result.amount,
            current_amount: result.current_amount,
            points: result.points,
            is_valid: result.is_valid,
            final_points: result.points * user_multiplier,
        }
    }
}

/// Per-user rollup across all task rows
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub date: String,
    #[serde(flatten)]
    pub identity: UserIdentity,
    pub gov_held: f64,
    pub multiplier: f64,
    /// Raw points across all rows, valid or not
    pub points: f64,
    /// Multiplier-scaled points over valid rows only
    pub final_points: f64,
    pub completed: Vec<TaskKind>,
    pub incomplete: Vec<TaskKind>,
}

/// Roll task rows up into one summary per user, sorted by descending
/// summed final points.
pub fn summarize(rows: &[UserTaskPoints]) -> Vec<UserSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_user: HashMap<&str, Vec<&UserTaskPoints>> = HashMap::new();
    for row in rows {
        let key = row.identity.payment_pkh.as_str();
        if !by_user.contains_key(key) {
            order.push(key);
        }
        by_user.entry(key).or_default().push(row);
    }

    let mut summaries: Vec<UserSummary> = order
        .into_iter()
        .map(|key| {
            let entries = &by_user[key];
            let first = entries[0];
            let points = entries.iter().map(|e| e.points).sum();
            let final_points = entries
                .iter()
                .filter(|e| e.is_valid)
                .map(|e| e.final_points)
                .sum();
            let completed: Vec<TaskKind> = entries
                .iter()
                .filter(|e| e.is_valid)
                .map(|e| e.task)
                .collect();
            // Invalid rows first, then tasks with no row at all
            let mut incomplete: Vec<TaskKind> = entries
                .iter()
                .filter(|e| !e.is_valid)
                .map(|e| e.task)
                .collect();
            incomplete.extend(
                TaskKind::ALL
                    .iter()
                    .copied()
                    .filter(|t| entries.iter().all(|e| e.task != *t)),
            );
            UserSummary {
                date: first.date.clone(),
                identity: first.identity.clone(),
                gov_held: first.gov_held,
                multiplier: first.multiplier,
                points,
                final_points,
                completed,
                incomplete,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.final_points.total_cmp(&a.final_points));
    summaries
}

/// Current run date, `YYYY-MM-DD` (UTC)
pub fn run_date() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// First six characters of a key hash, for display
pub fn short_key(key: &str) -> String {
    key.chars().take(6).collect()
}

/// Abbreviated address: six leading and six trailing characters
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 6..])
}
