//! Task engines
//!
//! Four structurally parallel aggregation algorithms. Each receives a
//! user's relevant transactions plus current-state snapshots and produces
//! `{amount, current_amount, is_valid, points}`. Evidence accumulates
//! strictly from transactions the resolver accepted; a failed transaction
//! is logged and contributes nothing. The quantity scored is always
//! `min(amount, current_amount)`, never the evidence total alone.

pub mod hold_ft;
pub mod registration;
pub mod stake_fund;
pub mod swap_offers;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The program's task set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Registration,
    SwapOffer,
    HoldFt,
    StakeFund,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Registration,
        TaskKind::SwapOffer,
        TaskKind::HoldFt,
        TaskKind::StakeFund,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::SwapOffer => "swap_offer",
            Self::HoldFt => "hold_ft",
            Self::StakeFund => "stake_fund",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one task evaluation for one user
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskResult {
    /// Evidence-derived activity, ADA-equivalent (or governance tokens for
    /// registration and staking)
    pub amount: f64,
    /// Present-state baseline in the same unit
    pub current_amount: f64,
    pub is_valid: bool,
    pub points: f64,
}

/// Program thresholds and caps
#[derive(Debug, Clone, Copy)]
pub struct TaskLimits {
    /// Minimum governance tokens for a valid registration
    pub min_registration_gov: f64,
    /// Minimum ADA-equivalent for a valid swap offer task
    pub min_swap_ada: f64,
    /// Global per-task points cap
    pub max_points: f64,
}

impl Default for TaskLimits {
    fn default() -> Self {
        Self {
            min_registration_gov: 100.0,
            min_swap_ada: 500.0,
            max_points: 4_000.0,
        }
    }
}

/// Multiplier-scaled, capped points over the scored quantity
pub(crate) fn scaled_points(min_amount: f64, factor: f64, max_points: f64) -> f64 {
    (min_amount * factor).min(max_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_names() {
        assert_eq!(TaskKind::Registration.name(), "registration");
        assert_eq!(TaskKind::StakeFund.to_string(), "stake_fund");
        assert_eq!(TaskKind::ALL.len(), 4);
    }

    #[test]
    fn test_scaled_points_caps_at_max() {
        assert_eq!(scaled_points(150.0, 2.0, 4_000.0), 300.0);
        assert_eq!(scaled_points(3_000.0, 2.0, 4_000.0), 4_000.0);
        assert_eq!(scaled_points(5_000.0, 1.0, 4_000.0), 4_000.0);
    }
}
