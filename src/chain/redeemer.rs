//! Typed redeemer decoders
//!
//! A redeemer carries the action parameters supplied when spending a
//! validator-owned output. Every variant has a fixed expected constructor
//! tag; a tag mismatch means "this redeemer does not apply here" and is a
//! normal control-flow outcome, not a fault. The real field list sits one
//! level down in a singleton constructor.

use super::value::PlutusValue;

/// Expected constructor tag for swap offer deposit redeemers
pub const TAG_SWAP_OFFER_DEPOSIT: u64 = 1;
/// Expected constructor tag for ADA-to-FT swap redeemers
pub const TAG_SWAP_ADA_TO_FT: u64 = 7;
/// Expected constructor tag for delegation deposit redeemers
pub const TAG_DELEGATION_DEPOSIT: u64 = 1;

/// Outcome of decoding one redeemer candidate
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome<T> {
    /// Candidate matched the expected variant
    Decoded(T),
    /// Constructor tag belongs to a different variant; keep scanning
    OtherVariant(u64),
    /// Candidate claims the expected tag but its fields are unusable
    Malformed,
}

impl<T> DecodeOutcome<T> {
    pub fn decoded(self) -> Option<T> {
        match self {
            Self::Decoded(value) => Some(value),
            _ => None,
        }
    }
}

fn inner_fields(value: &PlutusValue, expected_tag: u64) -> Result<&[PlutusValue], DecodeOutcome<()>> {
    let (tag, fields) = match value.constr() {
        Some(node) => node,
        None => return Err(DecodeOutcome::Malformed),
    };
    if tag != expected_tag {
        return Err(DecodeOutcome::OtherVariant(tag));
    }
    match fields.first().and_then(PlutusValue::constr) {
        Some((_, inner)) => Ok(inner),
        None => Err(DecodeOutcome::Malformed),
    }
}

fn carry<T>(outcome: DecodeOutcome<()>) -> DecodeOutcome<T> {
    match outcome {
        DecodeOutcome::OtherVariant(tag) => DecodeOutcome::OtherVariant(tag),
        _ => DecodeOutcome::Malformed,
    }
}

/// Deposit into an existing swap offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOfferDepositRedeemer {
    pub new_deposit_ft: i64,
    pub new_deposit_ada: i64,
}

impl SwapOfferDepositRedeemer {
    pub fn decode(value: &PlutusValue) -> DecodeOutcome<Self> {
        let inner = match inner_fields(value, TAG_SWAP_OFFER_DEPOSIT) {
            Ok(inner) => inner,
            Err(outcome) => return carry(outcome),
        };
        if inner.len() < 2 {
            return DecodeOutcome::Malformed;
        }
        match (inner[0].as_int(), inner[1].as_int()) {
            (Some(new_deposit_ft), Some(new_deposit_ada)) => DecodeOutcome::Decoded(Self {
                new_deposit_ft,
                new_deposit_ada,
            }),
            _ => DecodeOutcome::Malformed,
        }
    }
}

/// Purchase of fungible tokens with ADA from a swap offer
#[derive(Debug, Clone, PartialEq)]
pub struct SwapAdaToFtRedeemer {
    pub amount_ada: i64,
    pub amount_ft: i64,
    pub commission_ft: i64,
    /// Oracle payload, kept opaque
    pub oracle_data: PlutusValue,
    pub oracle_signature: String,
}

impl SwapAdaToFtRedeemer {
    /// Purchased amount net of commission
    pub fn net_ft(&self) -> i64 {
        self.amount_ft - self.commission_ft
    }

    pub fn decode(value: &PlutusValue) -> DecodeOutcome<Self> {
        let inner = match inner_fields(value, TAG_SWAP_ADA_TO_FT) {
            Ok(inner) => inner,
            Err(outcome) => return carry(outcome),
        };
        if inner.len() < 5 {
            return DecodeOutcome::Malformed;
        }
        match (inner[0].as_int(), inner[1].as_int(), inner[2].as_int()) {
            (Some(amount_ada), Some(amount_ft), Some(commission_ft)) => {
                DecodeOutcome::Decoded(Self {
                    amount_ada,
                    amount_ft,
                    commission_ft,
                    oracle_data: inner[3].clone(),
                    oracle_signature: inner[4].as_bytes().unwrap_or_default().to_string(),
                })
            }
            _ => DecodeOutcome::Malformed,
        }
    }
}

/// Change to a delegation's staked governance tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationDepositRedeemer {
    pub token_gov_change: i64,
}

impl DelegationDepositRedeemer {
    pub fn decode(value: &PlutusValue) -> DecodeOutcome<Self> {
        let inner = match inner_fields(value, TAG_DELEGATION_DEPOSIT) {
            Ok(inner) => inner,
            Err(outcome) => return carry(outcome),
        };
        match inner.first().and_then(PlutusValue::as_int) {
            Some(token_gov_change) => DecodeOutcome::Decoded(Self { token_gov_change }),
            None => DecodeOutcome::Malformed,
        }
    }
}
