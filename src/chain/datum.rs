//! Typed datum decoders
//!
//! A datum is the immutable state attached to a validator-owned output at
//! creation time. Decoding is positional against a fixed per-type schema;
//! a field count below the type's minimum or a wrong primitive kind on a
//! required field yields `None` rather than an error, so callers can keep
//! scanning other candidate outputs.

use super::value::PlutusValue;
use crate::types::{PaymentKeyHash, PolicyId};

/// State of a swap offer at creation time (16 positional fields)
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOfferDatum {
    pub version: i64,
    pub swap_offer_policy: PolicyId,
    pub fund_policy: PolicyId,
    pub seller_payment_pkh: PaymentKeyHash,
    /// Optional stake credential, kept opaque
    pub seller_stake_pkh: PlutusValue,
    pub asked_commission_bp_x1e3: i64,
    pub amount_ft_available: i64,
    pub amount_ada_available: i64,
    pub total_ft_earned: i64,
    pub total_ada_earned: i64,
    pub allow_sell_ft: i64,
    pub allow_sell_ada: i64,
    pub swap_status: i64,
    /// Governance asset class, kept opaque
    pub token_gov_asset: PlutusValue,
    pub required_token_gov: i64,
    pub min_ada: i64,
}

impl SwapOfferDatum {
    pub const MIN_FIELDS: usize = 16;

    /// Decode from a tagged value; `None` when the value is not a
    /// well-formed swap offer datum.
    pub fn from_plutus(value: &PlutusValue) -> Option<Self> {
        let fields = value.record_fields()?;
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Some(Self {
            version: fields[0].as_int()?,
            swap_offer_policy: fields[1].as_bytes()?.to_string(),
            fund_policy: fields[2].as_bytes()?.to_string(),
            seller_payment_pkh: fields[3].as_bytes()?.to_string(),
            seller_stake_pkh: fields[4].clone(),
            asked_commission_bp_x1e3: fields[5].as_int()?,
            amount_ft_available: fields[6].as_int()?,
            amount_ada_available: fields[7].as_int()?,
            total_ft_earned: fields[8].as_int()?,
            total_ada_earned: fields[9].as_int()?,
            allow_sell_ft: fields[10].as_int()?,
            allow_sell_ada: fields[11].as_int()?,
            swap_status: fields[12].as_int()?,
            token_gov_asset: fields[13].clone(),
            required_token_gov: fields[14].as_int()?,
            min_ada: fields[15].as_int()?,
        })
    }
}

/// State of a delegation at creation time (8 positional fields)
#[derive(Debug, Clone, PartialEq)]
pub struct DelegationDatum {
    pub version: i64,
    pub delegation_policy: PolicyId,
    pub fund_policy: PolicyId,
    pub delegator_payment_pkh: PaymentKeyHash,
    /// Optional stake credential, kept opaque
    pub delegator_stake_pkh: PlutusValue,
    /// Governance asset class, kept opaque
    pub token_gov_asset: PlutusValue,
    pub staked: i64,
    pub min_ada: i64,
}

impl DelegationDatum {
    pub const MIN_FIELDS: usize = 8;

    /// Decode from a tagged value; `None` when the value is not a
    /// well-formed delegation datum.
    pub fn from_plutus(value: &PlutusValue) -> Option<Self> {
        let fields = value.record_fields()?;
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Some(Self {
            version: fields[0].as_int()?,
            delegation_policy: fields[1].as_bytes()?.to_string(),
            fund_policy: fields[2].as_bytes()?.to_string(),
            delegator_payment_pkh: fields[3].as_bytes()?.to_string(),
            delegator_stake_pkh: fields[4].clone(),
            token_gov_asset: fields[5].clone(),
            staked: fields[6].as_int()?,
            min_ada: fields[7].as_int()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> PlutusValue {
        PlutusValue::Int { int: n }
    }

    fn bytes(s: &str) -> PlutusValue {
        PlutusValue::Bytes {
            bytes: s.to_string(),
        }
    }

    fn constr(tag: u64, fields: Vec<PlutusValue>) -> PlutusValue {
        PlutusValue::Constr {
            constructor: tag,
            fields,
        }
    }

    fn swap_offer_fields(ft_available: i64, ada_available: i64) -> Vec<PlutusValue> {
        vec![
            int(1),                       // version
            bytes("b0"),                  // swap offer policy
            bytes("policyABC"),           // fund policy
            bytes("pkh1"),                // seller payment pkh
            constr(1, vec![]),            // no stake credential
            int(50),                      // commission
            int(ft_available),
            int(ada_available),
            int(0),
            int(0),
            int(1),
            int(1),
            int(1),
            constr(0, vec![bytes("gov"), bytes("aa")]),
            int(100),
            int(2_000_000),
        ]
    }

    fn delegation_fields(staked: i64) -> Vec<PlutusValue> {
        vec![
            int(1),
            bytes("d0"),
            bytes("policyABC"),
            bytes("pkh1"),
            constr(1, vec![]),
            constr(0, vec![bytes("gov"), bytes("aa")]),
            int(staked),
            int(2_000_000),
        ]
    }

    #[test]
    fn test_swap_offer_datum_decodes() {
        let value = constr(0, vec![constr(0, swap_offer_fields(500_000, 1_000_000))]);
        let datum = SwapOfferDatum::from_plutus(&value).expect("decodes");
        assert_eq!(datum.fund_policy, "policyABC");
        assert_eq!(datum.amount_ft_available, 500_000);
        assert_eq!(datum.amount_ada_available, 1_000_000);
    }

    #[test]
    fn test_swap_offer_datum_flat_fields() {
        // Some encoders skip the singleton wrapping
        let value = constr(0, swap_offer_fields(7, 8));
        let datum = SwapOfferDatum::from_plutus(&value).expect("decodes");
        assert_eq!(datum.amount_ft_available, 7);
    }

    #[test]
    fn test_swap_offer_datum_short_fields_rejected() {
        let mut fields = swap_offer_fields(1, 2);
        fields.truncate(10);
        assert!(SwapOfferDatum::from_plutus(&constr(0, fields)).is_none());
    }

    #[test]
    fn test_swap_offer_datum_wrong_leaf_kind_rejected() {
        let mut fields = swap_offer_fields(1, 2);
        fields[6] = bytes("not-an-int");
        assert!(SwapOfferDatum::from_plutus(&constr(0, fields)).is_none());
    }

    #[test]
    fn test_swap_offer_datum_leaf_rejected() {
        assert!(SwapOfferDatum::from_plutus(&int(1)).is_none());
    }

    #[test]
    fn test_delegation_datum_decodes() {
        let value = constr(0, vec![constr(0, delegation_fields(300_000_000))]);
        let datum = DelegationDatum::from_plutus(&value).expect("decodes");
        assert_eq!(datum.staked, 300_000_000);
        assert_eq!(datum.delegator_payment_pkh, "pkh1");
    }

    #[test]
    fn test_delegation_datum_non_int_staked_rejected() {
        let mut fields = delegation_fields(0);
        fields[6] = bytes("ff");
        assert!(DelegationDatum::from_plutus(&constr(0, fields)).is_none());
    }

    #[test]
    fn test_decoding_is_pure() {
        let value = constr(0, delegation_fields(42));
        assert_eq!(
            DelegationDatum::from_plutus(&value),
            DelegationDatum::from_plutus(&value)
        );
    }
}
