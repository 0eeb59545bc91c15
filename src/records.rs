//! Upstream record types and the records-provider boundary
//!
//! The engine consumes cached ledger records (funds, offer and delegation
//! snapshots, per-user confirmed transactions) from an upstream store it
//! does not own. [`RecordsProvider`] is that boundary; storage schema and
//! connection lifecycle live on the other side of it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{AssetUnit, PaymentKeyHash, PolicyId, Result};

/// Program actions a transaction can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxAction {
    SwapOfferCreate,
    SwapOfferDeposit,
    SwapOfferBuyFt,
    DelegationCreate,
    DelegationDeposit,
}

impl TxAction {
    /// Label used by the upstream transaction store
    pub fn label(&self) -> &'static str {
        match self {
            Self::SwapOfferCreate => "Swap Offer - Create",
            Self::SwapOfferDeposit => "Swap Offer - Deposit",
            Self::SwapOfferBuyFt => "Swap Offer - Buy FT",
            Self::DelegationCreate => "Delegation - Create",
            Self::DelegationDeposit => "Delegation - Deposit",
        }
    }
}

/// One confirmed transaction of a user, pre-filtered by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub action: TxAction,
    pub payment_pkh: PaymentKeyHash,
}

/// Mapping from a fund's minting policy to its token name component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    pub policy: PolicyId,
    pub token_name_hex: String,
}

impl Fund {
    /// Canonical unit string of the fund's fungible token
    pub fn unit(&self) -> AssetUnit {
        format!("{}{}", self.policy, self.token_name_hex)
    }
}

/// Exact-match fund lookup by policy id
pub fn fund_for_policy<'a>(funds: &'a [Fund], policy: &str) -> Option<&'a Fund> {
    funds
        .iter()
        .find(|f| f.policy == policy && !f.token_name_hex.is_empty())
}

/// Current-state snapshot of one swap offer.
/// Amounts are integer base units kept as decimal strings by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapOfferRecord {
    pub seller_payment_pkh: PaymentKeyHash,
    pub fund_policy: PolicyId,
    pub amount_ft_available: String,
    pub amount_ada_available: String,
}

/// Current-state snapshot of one delegation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationRecord {
    pub delegator_payment_pkh: PaymentKeyHash,
    pub fund_policy: PolicyId,
    pub staked: String,
}

/// Parse a store-kept base-unit amount string
pub fn parse_base_units(raw: &str) -> Option<i128> {
    raw.trim().parse::<i128>().ok()
}

/// Boundary to the upstream record store
#[async_trait]
pub trait RecordsProvider: Send + Sync {
    /// All funds known to the program
    async fn funds(&self) -> Result<Vec<Fund>>;

    /// All swap offer snapshots
    async fn swap_offers(&self) -> Result<Vec<SwapOfferRecord>>;

    /// All delegation snapshots
    async fn delegations(&self) -> Result<Vec<DelegationRecord>>;

    /// Confirmed transactions of one user restricted to the given actions,
    /// in stable chronological order
    async fn transactions_for(
        &self,
        payment_pkh: &str,
        actions: &[TxAction],
    ) -> Result<Vec<TransactionRecord>>;
}
