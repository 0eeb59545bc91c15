//! Swap offers task
//!
//! Evidence: fungible tokens and ADA committed into offers, from create
//! datums and deposit redeemers. Baseline: every offer snapshot of the
//! seller, priced the same way. The baseline deliberately does not filter
//! by offer status or liveness; that matches the upstream store's current
//! behavior.

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::ledger::ChainIndex;
use crate::prices::{PriceOracle, PriceSource};
use crate::records::{fund_for_policy, parse_base_units, Fund, SwapOfferRecord, TransactionRecord, TxAction};
use crate::resolver::{EvidenceResolver, ValidatorTarget};
use crate::types::{AssetUnit, PointsError, Result, UNIT_SCALE};

use super::{scaled_points, TaskLimits, TaskResult};

/// FT and ADA legs contributed by one accepted transaction
struct TxLegs {
    unit: AssetUnit,
    ft: i128,
    lovelace: i128,
}

#[allow(clippy::too_many_arguments)]
pub async fn evaluate<C: ChainIndex, S: PriceSource>(
    chain: &C,
    oracle: &PriceOracle<S>,
    limits: &TaskLimits,
    payment_pkh: &str,
    wallet_address: &str,
    swap_offer_target: &ValidatorTarget,
    funds: &[Fund],
    offers: &[SwapOfferRecord],
    txs: &[TransactionRecord],
) -> Result<TaskResult> {
    let resolver = EvidenceResolver::new(chain);

    let outcomes = join_all(txs.iter().map(|tx| {
        tx_contribution(&resolver, tx, wallet_address, swap_offer_target, funds)
    }))
    .await;

    // Ordered by unit so the float summation below is run-to-run stable
    let mut ft_by_unit: BTreeMap<AssetUnit, i128> = BTreeMap::new();
    let mut total_lovelace: i128 = 0;
    for (tx, outcome) in txs.iter().zip(outcomes) {
        match outcome {
            Ok(legs) => {
                debug!(
                    task = "swap_offer",
                    tx = %tx.hash,
                    unit = %legs.unit,
                    ft = legs.ft,
                    lovelace = legs.lovelace,
                    "evidence accepted"
                );
                *ft_by_unit.entry(legs.unit).or_default() += legs.ft;
                total_lovelace += legs.lovelace;
            }
            Err(err) => {
                warn!(task = "swap_offer", tx = %tx.hash, "transaction skipped: {}", err);
            }
        }
    }

    // Evidence pricing failures fail the whole task; the evidence total is
    // meaningless with a unit missing.
    let mut amount = total_lovelace as f64 / UNIT_SCALE;
    for (unit, ft) in &ft_by_unit {
        let price = oracle.price_in_lovelace(unit).await?;
        amount += (ft * price as i128) as f64 / UNIT_SCALE / UNIT_SCALE;
    }

    // Baseline: all of the seller's offers regardless of status. Bad
    // snapshot rows are logged and skipped, they do not fail the task.
    let mut current_amount = 0.0;
    for offer in offers.iter().filter(|o| o.seller_payment_pkh == payment_pkh) {
        let (Some(ft), Some(lovelace)) = (
            parse_base_units(&offer.amount_ft_available),
            parse_base_units(&offer.amount_ada_available),
        ) else {
            warn!(task = "swap_offer", user = payment_pkh, "unparseable offer snapshot, skipped");
            continue;
        };
        let Some(fund) = fund_for_policy(funds, &offer.fund_policy) else {
            warn!(
                task = "swap_offer",
                user = payment_pkh,
                policy = %offer.fund_policy,
                "offer snapshot without fund, skipped"
            );
            continue;
        };
        let unit = fund.unit();
        match oracle.price_in_lovelace(&unit).await {
            Ok(price) => {
                current_amount += (ft * price as i128) as f64 / UNIT_SCALE / UNIT_SCALE;
                current_amount += lovelace as f64 / UNIT_SCALE;
            }
            Err(err) => {
                warn!(task = "swap_offer", unit = %unit, "offer snapshot unpriced, skipped: {}", err);
            }
        }
    }

    let min_amount = amount.min(current_amount);
    if min_amount < limits.min_swap_ada {
        info!(task = "swap_offer", user = payment_pkh, min_amount, "below threshold");
        return Ok(TaskResult {
            amount,
            current_amount,
            is_valid: false,
            points: 0.0,
        });
    }
    let points = scaled_points(min_amount, 2.0, limits.max_points);
    info!(task = "swap_offer", user = payment_pkh, min_amount, points, "valid");
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
) -> Result<TxLegs> {
    let utxos = resolver.wallet_utxos(&tx.hash, wallet_address).await?;
    match tx.action {
        TxAction::SwapOfferCreate => {
            let (datum, unit) = resolver
                .find_swap_offer_datum(&tx.hash, &utxos.outputs, target, funds)
                .await?;
            Ok(TxLegs {
                unit,
                ft: datum.amount_ft_available as i128,
                lovelace: datum.amount_ada_available as i128,
            })
        }
        TxAction::SwapOfferDeposit => {
            let redeemer = resolver.find_swap_deposit_redeemer(&tx.hash, target).await?;
            // The deposited token's unit comes from the offer datum carried
            // by the same transaction's validator output
            let (_, unit) = resolver
                .find_swap_offer_datum(&tx.hash, &utxos.outputs, target, funds)
                .await?;
            Ok(TxLegs {
                unit,
                ft: redeemer.new_deposit_ft as i128,
                lovelace: redeemer.new_deposit_ada as i128,
            })
        }
        _ => Err(PointsError::NoEvidence(format!(
            "tx {} is not a swap offer create or deposit",
            tx.hash
        ))),
    }
}
