//! Shared in-memory fakes and fixture builders for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::chain::redeemer::{TAG_DELEGATION_DEPOSIT, TAG_SWAP_ADA_TO_FT, TAG_SWAP_OFFER_DEPOSIT};
use crate::chain::PlutusValue;
use crate::ledger::{AssetAmount, ChainIndex, RedeemerRef, TxInput, TxOutput, TxUtxos};
use crate::prices::{PricePoint, PriceSource};
use crate::types::{PointsError, Result};

pub const WALLET_ADDR: &str = "addr_wallet";
pub const SCRIPT_ADDR: &str = "addr_script";
pub const SCRIPT_HASH: &str = "scripthash";

pub fn int(n: i64) -> PlutusValue {
    PlutusValue::Int { int: n }
}

pub fn bytes(s: &str) -> PlutusValue {
    PlutusValue::Bytes {
        bytes: s.to_string(),
    }
}

pub fn constr(tag: u64, fields: Vec<PlutusValue>) -> PlutusValue {
    PlutusValue::Constr {
        constructor: tag,
        fields,
    }
}

/// Well-formed swap offer datum for fund policy `policyABC`
pub fn swap_offer_datum_value(ft_available: i64, ada_available: i64) -> PlutusValue {
    swap_offer_datum_for_policy("policyABC", ft_available, ada_available)
}

/// Well-formed swap offer datum for an arbitrary fund policy
pub fn swap_offer_datum_for_policy(
    policy: &str,
    ft_available: i64,
    ada_available: i64,
) -> PlutusValue {
    constr(
        0,
        vec![constr(
            0,
            vec![
                int(1),
                bytes("b0"),
                bytes(policy),
                bytes("pkh1"),
                constr(1, vec![]),
                int(50),
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
            ],
        )],
    )
}

/// Well-formed delegation datum
pub fn delegation_datum_value(staked: i64) -> PlutusValue {
    constr(
        0,
        vec![constr(
            0,
            vec![
                int(1),
                bytes("d0"),
                bytes("policyABC"),
                bytes("pkh1"),
                constr(1, vec![]),
                constr(0, vec![bytes("gov"), bytes("aa")]),
                int(staked),
                int(2_000_000),
            ],
        )],
    )
}

pub fn swap_deposit_redeemer_value(ft: i64, ada: i64) -> PlutusValue {
    constr(
        TAG_SWAP_OFFER_DEPOSIT,
        vec![constr(0, vec![int(ft), int(ada)])],
    )
}

pub fn swap_buy_redeemer_value(ada: i64, ft: i64, commission_ft: i64) -> PlutusValue {
    constr(
        TAG_SWAP_ADA_TO_FT,
        vec![constr(
            0,
            vec![
                int(ada),
                int(ft),
                int(commission_ft),
                constr(0, vec![]),
                bytes("sig"),
            ],
        )],
    )
}

pub fn delegation_deposit_redeemer_value(change: i64) -> PlutusValue {
    constr(TAG_DELEGATION_DEPOSIT, vec![constr(0, vec![int(change)])])
}

pub fn tx_output(address: &str, inline_datum: Option<PlutusValue>, data_hash: Option<&str>) -> TxOutput {
    TxOutput {
        address: address.to_string(),
        inline_datum,
        data_hash: data_hash.map(str::to_string),
    }
}

pub fn tx_utxos(input_addresses: &[&str], outputs: Vec<TxOutput>) -> TxUtxos {
    TxUtxos {
        inputs: input_addresses
            .iter()
            .map(|a| TxInput {
                address: a.to_string(),
            })
            .collect(),
        outputs,
    }
}

pub fn redeemer_ref(purpose: &str, script_hash: &str, data_hash: Option<&str>) -> RedeemerRef {
    RedeemerRef {
        purpose: purpose.to_string(),
        script_hash: script_hash.to_string(),
        redeemer_data_hash: data_hash.map(str::to_string),
    }
}

/// In-memory [`ChainIndex`] backed by hash maps
#[derive(Default)]
pub struct FakeChain {
    pub utxos: HashMap<String, TxUtxos>,
    pub redeemers: HashMap<String, Vec<RedeemerRef>>,
    pub datums: HashMap<String, PlutusValue>,
    pub assets: HashMap<String, Vec<AssetAmount>>,
}

#[async_trait]
impl ChainIndex for FakeChain {
    async fn tx_utxos(&self, tx_hash: &str) -> Result<TxUtxos> {
        self.utxos
            .get(tx_hash)
            .cloned()
            .ok_or_else(|| PointsError::Ledger(format!("unknown tx {}", tx_hash)))
    }

    async fn tx_redeemers(&self, tx_hash: &str) -> Result<Vec<RedeemerRef>> {
        Ok(self.redeemers.get(tx_hash).cloned().unwrap_or_default())
    }

    async fn datum(&self, datum_hash: &str) -> Result<PlutusValue> {
        self.datums
            .get(datum_hash)
            .cloned()
            .ok_or_else(|| PointsError::Ledger(format!("unknown datum {}", datum_hash)))
    }

    async fn address_assets(&self, address: &str) -> Result<Vec<AssetAmount>> {
        Ok(self.assets.get(address).cloned().unwrap_or_default())
    }
}

/// A minimal chain with one wallet-authored transaction `tx1`
pub fn fake_chain() -> FakeChain {
    let mut chain = FakeChain::default();
    chain
        .utxos
        .insert("tx1".to_string(), tx_utxos(&[WALLET_ADDR], vec![]));
    chain
}

/// Price source with fixed spot prices and a generated history, counting
/// outbound calls so cache behavior is observable
pub struct FakePriceSource {
    pub spot_prices: HashMap<String, i64>,
    pub history_len: usize,
    pub history_last_date: NaiveDate,
    pub spot_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
}

impl FakePriceSource {
    pub fn new() -> Self {
        Self {
            spot_prices: HashMap::new(),
            history_len: 30,
            history_last_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            spot_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_price(mut self, unit: &str, price: i64) -> Self {
        self.spot_prices.insert(unit.to_string(), price);
        self
    }
}

#[async_trait]
impl PriceSource for FakePriceSource {
    async fn spot(&self, policy: &str, name_hex: &str) -> Result<i64> {
        self.spot_calls.fetch_add(1, Ordering::SeqCst);
        let unit = format!("{}{}", policy, name_hex);
        self.spot_prices
            .get(&unit)
            .copied()
            .ok_or_else(|| PointsError::Price(format!("no price for {}", unit)))
    }

    async fn history(&self, _policy: &str, _name_hex: &str) -> Result<Vec<PricePoint>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let start = self.history_last_date - chrono::Days::new(self.history_len as u64 - 1);
        Ok((0..self.history_len)
            .map(|i| PricePoint {
                date: start + chrono::Days::new(i as u64),
                price_ada_x1e6: 2_000_000 + i as i64,
            })
            .collect())
    }
}
