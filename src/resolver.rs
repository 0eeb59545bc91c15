//! Evidence resolver
//!
//! For one transaction hash, assembles the minimal typed evidence a task
//! engine needs: verifies the acting wallet supplied an input, then locates
//! the datum or redeemer matching a target validator. Candidate scans walk
//! the ledger-reported order and stop at the first match; with several
//! plausible candidates that order decides the outcome, so the scans are
//! never parallelized.

use tracing::{debug, warn};

use crate::chain::{
    DecodeOutcome, DelegationDatum, DelegationDepositRedeemer, PlutusValue, SwapAdaToFtRedeemer,
    SwapOfferDatum, SwapOfferDepositRedeemer,
};
use crate::ledger::{ChainIndex, TxOutput, TxUtxos};
use crate::records::{fund_for_policy, Fund};
use crate::types::{AssetUnit, PointsError, Result};

/// A validator the resolver matches against. The script hash is derived
/// from the address by an external capability and supplied pre-computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorTarget {
    pub address: String,
    pub script_hash: String,
}

/// Typed evidence extraction over a [`ChainIndex`]
pub struct EvidenceResolver<'a, C: ChainIndex> {
    chain: &'a C,
}

impl<'a, C: ChainIndex> EvidenceResolver<'a, C> {
    pub fn new(chain: &'a C) -> Self {
        Self { chain }
    }

    /// Fetch a transaction's utxos and verify the acting wallet authored it
    /// (at least one input address equals the wallet address).
    pub async fn wallet_utxos(&self, tx_hash: &str, wallet_address: &str) -> Result<TxUtxos> {
        let utxos = self.chain.tx_utxos(tx_hash).await?;
        if !utxos.inputs.iter().any(|i| i.address == wallet_address) {
            return Err(PointsError::NoEvidence(format!(
                "no input from wallet {} in tx {}",
                wallet_address, tx_hash
            )));
        }
        Ok(utxos)
    }

    /// Materialize an output's datum: inline value when present, otherwise
    /// fetched by hash. Fetch failures degrade to "no datum here".
    async fn output_datum(&self, output: &TxOutput, tx_hash: &str) -> Option<PlutusValue> {
        if let Some(inline) = &output.inline_datum {
            return Some(inline.clone());
        }
        let hash = output.data_hash.as_deref()?;
        match self.chain.datum(hash).await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(tx = tx_hash, datum_hash = hash, "datum fetch failed: {}", err);
                None
            }
        }
    }

    /// First output at the target address whose datum decodes as a swap
    /// offer and whose fund policy is known. Returns the datum together
    /// with the fund's canonical token unit.
    pub async fn find_swap_offer_datum(
        &self,
        tx_hash: &str,
        outputs: &[TxOutput],
        target: &ValidatorTarget,
        funds: &[Fund],
    ) -> Result<(SwapOfferDatum, AssetUnit)> {
        for output in outputs.iter().filter(|o| o.address == target.address) {
            let Some(value) = self.output_datum(output, tx_hash).await else {
                continue;
            };
            let Some(datum) = SwapOfferDatum::from_plutus(&value) else {
                debug!(tx = tx_hash, "output datum is not a swap offer, skipping");
                continue;
            };
            let Some(fund) = fund_for_policy(funds, &datum.fund_policy) else {
                debug!(
                    tx = tx_hash,
                    policy = %datum.fund_policy,
                    "no fund for datum policy, skipping"
                );
                continue;
            };
            let unit = fund.unit();
            return Ok((datum, unit));
        }
        Err(PointsError::NoEvidence(format!(
            "no valid swap offer datum in tx {}",
            tx_hash
        )))
    }

    /// First output at the target address whose datum decodes as a
    /// delegation.
    pub async fn find_delegation_datum(
        &self,
        tx_hash: &str,
        outputs: &[TxOutput],
        target: &ValidatorTarget,
    ) -> Result<DelegationDatum> {
        for output in outputs.iter().filter(|o| o.address == target.address) {
            let Some(value) = self.output_datum(output, tx_hash).await else {
                continue;
            };
            if let Some(datum) = DelegationDatum::from_plutus(&value) {
                return Ok(datum);
            }
        }
        Err(PointsError::NoEvidence(format!(
            "no valid delegation datum in tx {}",
            tx_hash
        )))
    }

    /// First redeemer with purpose `spend` at the target script whose value
    /// decodes as the requested variant.
    async fn scan_redeemers<T>(
        &self,
        tx_hash: &str,
        target: &ValidatorTarget,
        what: &str,
        decode: impl Fn(&PlutusValue) -> DecodeOutcome<T>,
    ) -> Result<T> {
        let redeemers = self.chain.tx_redeemers(tx_hash).await?;
        for redeemer in &redeemers {
            if redeemer.purpose != "spend" || redeemer.script_hash != target.script_hash {
                continue;
            }
            let Some(data_hash) = redeemer.redeemer_data_hash.as_deref() else {
                continue;
            };
            let value = match self.chain.datum(data_hash).await {
                Ok(value) => value,
                Err(err) => {
                    warn!(
                        tx = tx_hash,
                        redeemer_hash = data_hash,
                        "redeemer fetch failed: {}",
                        err
                    );
                    continue;
                }
            };
            match decode(&value) {
                DecodeOutcome::Decoded(typed) => return Ok(typed),
                DecodeOutcome::OtherVariant(tag) => {
                    debug!(tx = tx_hash, tag, "redeemer is another {} variant, skipping", what);
                }
                DecodeOutcome::Malformed => {
                    debug!(tx = tx_hash, "malformed {} redeemer candidate, skipping", what);
                }
            }
        }
        Err(PointsError::NoEvidence(format!(
            "no valid {} redeemer in tx {}",
            what, tx_hash
        )))
    }

    /// Locate the swap offer deposit redeemer of a transaction
    pub async fn find_swap_deposit_redeemer(
        &self,
        tx_hash: &str,
        target: &ValidatorTarget,
    ) -> Result<SwapOfferDepositRedeemer> {
        self.scan_redeemers(tx_hash, target, "DEPOSIT", SwapOfferDepositRedeemer::decode)
            .await
    }

    /// Locate the ADA-to-FT swap redeemer of a transaction
    pub async fn find_swap_buy_redeemer(
        &self,
        tx_hash: &str,
        target: &ValidatorTarget,
    ) -> Result<SwapAdaToFtRedeemer> {
        self.scan_redeemers(tx_hash, target, "ADAxFT", SwapAdaToFtRedeemer::decode)
            .await
    }

    /// Locate the delegation deposit redeemer of a transaction
    pub async fn find_delegation_deposit_redeemer(
        &self,
        tx_hash: &str,
        target: &ValidatorTarget,
    ) -> Result<DelegationDepositRedeemer> {
        self.scan_redeemers(tx_hash, target, "DEPOSIT", DelegationDepositRedeemer::decode)
            .await
    }
}
