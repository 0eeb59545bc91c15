//! Shared types and aliases for the points engine

pub mod error;

pub use error::{PointsError, Result};

/// Hex-encoded payment credential hash, the primary user key
pub type PaymentKeyHash = String;

/// Hex-encoded minting-policy identifier (CS)
pub type PolicyId = String;

/// Canonical token unit: policy id concatenated with the hex token name
pub type AssetUnit = String;

/// Unit string of the network's base currency (micro-ADA)
pub const LOVELACE: &str = "lovelace";

/// Micro-ADA per ADA; also the scaling of the program's 6-decimal tokens
pub const UNIT_SCALE: f64 = 1_000_000.0;

/// Length of a hex-encoded policy id within a unit string
pub const POLICY_HEX_LEN: usize = 56;
