//! Registration task
//!
//! Sums governance tokens purchased through swap buy evidence (amount net
//! of commission) and compares against the user's present governance
//! holding. Registration is an eligibility gate: it never awards raw
//! points, validity alone is the signal.

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::ledger::ChainIndex;
use crate::records::{TransactionRecord, TxAction};
use crate::resolver::{EvidenceResolver, ValidatorTarget};
use crate::types::{PointsError, Result, UNIT_SCALE};

use super::{TaskLimits, TaskResult};

pub async fn evaluate<C: ChainIndex>(
    chain: &C,
    limits: &TaskLimits,
    payment_pkh: &str,
    wallet_address: &str,
    gov_held: f64,
    swap_offer_target: &ValidatorTarget,
    txs: &[TransactionRecord],
) -> TaskResult {
    let resolver = EvidenceResolver::new(chain);

    let contributions = join_all(txs.iter().map(|tx| {
        tx_contribution(&resolver, tx, wallet_address, swap_offer_target)
    }))
    .await;

    let mut total_gov: i128 = 0;
    for (tx, outcome) in txs.iter().zip(contributions) {
        match outcome {
            Ok(net_ft) => {
                total_gov += net_ft;
                debug!(task = "registration", tx = %tx.hash, net_ft, "evidence accepted");
            }
            Err(err) => {
                warn!(task = "registration", tx = %tx.hash, "transaction skipped: {}", err);
            }
        }
    }

    let amount = total_gov as f64 / UNIT_SCALE;
    let current_amount = gov_held;
    let min_amount = amount.min(current_amount);
    let is_valid = min_amount >= limits.min_registration_gov;
    if is_valid {
        info!(task = "registration", user = payment_pkh, min_amount, "valid");
    } else {
        info!(task = "registration", user = payment_pkh, min_amount, "below threshold");
    }

    TaskResult {
        amount,
        current_amount,
        is_valid,
        // Eligibility signal only, no scaled points for registration
        points: 0.0,
    }
}

async fn tx_contribution<C: ChainIndex>(
    resolver: &EvidenceResolver<'_, C>,
    tx: &TransactionRecord,
    wallet_address: &str,
    target: &ValidatorTarget,
) -> Result<i128> {
    resolver.wallet_utxos(&tx.hash, wallet_address).await?;
    if tx.action != TxAction::SwapOfferBuyFt {
        return Err(PointsError::NoEvidence(format!(
            "tx {} is not a swap buy",
            tx.hash
        )));
    }
    let redeemer = resolver.find_swap_buy_redeemer(&tx.hash, target).await?;
    Ok(redeemer.net_ft() as i128)
}
