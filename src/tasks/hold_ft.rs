//! Hold fund tokens task
//!
//! Evidence: fungible tokens acquired through swap buys, grouped by unit.
//! Baseline: the wallet's current balance of each acquired unit at the
//! same price. Total-ever-acquired is compared against current balance
//! without capping either side; that is the upstream behavior, preserved
//! literally.

use std::collections::{BTreeMap, HashMap};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::ledger::ChainIndex;
use crate::prices::{PriceOracle, PriceSource};
use crate::records::{Fund, TransactionRecord, TxAction};
use crate::resolver::{EvidenceResolver, ValidatorTarget};
use crate::types::{AssetUnit, PointsError, Result, UNIT_SCALE};

use super::{scaled_points, TaskLimits, TaskResult};

#[allow(clippy::too_many_arguments)]
pub async fn evaluate<C: ChainIndex, S: PriceSource>(
    chain: &C,
    oracle: &PriceOracle<S>,
    limits: &TaskLimits,
    payment_pkh: &str,
    wallet_address: &str,
    wallet_amounts: &HashMap<AssetUnit, i128>,
    swap_offer_target: &ValidatorTarget,
    funds: &[Fund],
    txs: &[TransactionRecord],
) -> Result<TaskResult> {
    let resolver = EvidenceResolver::new(chain);

    let outcomes = join_all(txs.iter().map(|tx| {
        tx_contribution(&resolver, tx, wallet_address, swap_offer_target, funds)
    }))
    .await;

    // Ordered by unit so the float summation below is run-to-run stable
    let mut bought_by_unit: BTreeMap<AssetUnit, i128> = BTreeMap::new();
    for (tx, outcome) in txs.iter().zip(outcomes) {
        match outcome {
            Ok((unit, net_ft)) => {
                debug!(task = "hold_ft", tx = %tx.hash, unit = %unit, net_ft, "evidence accepted");
                *bought_by_unit.entry(unit).or_default() += net_ft;
            }
            Err(err) => {
                warn!(task = "hold_ft", tx = %tx.hash, "transaction skipped: {}", err);
            }
        }
    }

    let mut amount = 0.0;
    let mut current_amount = 0.0;
    for (unit, bought) in &bought_by_unit {
        let price = oracle.price_in_lovelace(unit).await? as i128;
        let balance = wallet_amounts.get(unit).copied().unwrap_or(0);
        amount += (bought * price) as f64 / UNIT_SCALE / UNIT_SCALE;
        current_amount += (balance * price) as f64 / UNIT_SCALE / UNIT_SCALE;
    }

    let min_amount = amount.min(current_amount);
    let points = scaled_points(min_amount, 1.0, limits.max_points);
    info!(task = "hold_ft", user = payment_pkh, min_amount, points, "scored");
    Ok(TaskResult {
        amount,
        current_amount,
        is_valid: true,
        points,
    })
}

async fn tx_contribution<C: ChainIndex>(
    resolver: &EvidenceResolver<'_, C>,
    tx: &TransactionRecord,
    wallet_address: &str,
    target: &ValidatorTarget,
    funds: &[Fund],
) -> Result<(AssetUnit, i128)> {
    let utxos = resolver.wallet_utxos(&tx.hash, wallet_address).await?;
    if tx.action != TxAction::SwapOfferBuyFt {
        return Err(PointsError::NoEvidence(format!(
            "tx {} is not a swap buy",
            tx.hash
        )));
    }
    // The bought token's unit comes from the offer datum, the bought
    // amount from the swap redeemer of the same transaction
    let (_, unit) = resolver
        .find_swap_offer_datum(&tx.hash, &utxos.outputs, target, funds)
        .await?;
    let redeemer = resolver.find_swap_buy_redeemer(&tx.hash, target).await?;
    Ok((unit, redeemer.net_ft() as i128))
}
