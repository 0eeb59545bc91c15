//! Stake-in-funds task
//!
//! Evidence: governance tokens staked through delegation create datums and
//! deposit redeemers. A deposit whose change is zero or negative is valid
//! evidence that contributes nothing; withdrawals are never subtracted.
//! Baseline: the user's current delegation snapshots.

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::ledger::ChainIndex;
use crate::records::{parse_base_units, DelegationRecord, TransactionRecord, TxAction};
use crate::resolver::{EvidenceResolver, ValidatorTarget};
use crate::types::{PointsError, Result, UNIT_SCALE};

use super::{scaled_points, TaskLimits, TaskResult};

pub async fn evaluate<C: ChainIndex>(
    chain: &C,
    limits: &TaskLimits,
    payment_pkh: &str,
    wallet_address: &str,
    delegations: &[DelegationRecord],
    delegation_target: &ValidatorTarget,
    txs: &[TransactionRecord],
) -> TaskResult {
    let resolver = EvidenceResolver::new(chain);

    let outcomes = join_all(txs.iter().map(|tx| {
        tx_contribution(&resolver, tx, wallet_address, delegation_target)
    }))
    .await;

    let mut total_staked: i128 = 0;
    for (tx, outcome) in txs.iter().zip(outcomes) {
        match outcome {
            Ok(staked) => {
                total_staked += staked;
                debug!(task = "stake_fund", tx = %tx.hash, staked, "evidence accepted");
            }
            Err(err) => {
                warn!(task = "stake_fund", tx = %tx.hash, "transaction skipped: {}", err);
            }
        }
    }

    let amount = total_staked as f64 / UNIT_SCALE;

    let mut current_amount = 0.0;
    for delegation in delegations
        .iter()
        .filter(|d| d.delegator_payment_pkh == payment_pkh)
    {
        match parse_base_units(&delegation.staked) {
            Some(staked) => current_amount += staked as f64 / UNIT_SCALE,
            None => {
                warn!(
                    task = "stake_fund",
                    user = payment_pkh,
                    "unparseable delegation snapshot, skipped"
                );
            }
        }
    }

    let min_amount = amount.min(current_amount);
    let points = scaled_points(min_amount, 2.0, limits.max_points);
    info!(task = "stake_fund", user = payment_pkh, min_amount, points, "scored");
    TaskResult {
        amount,
        current_amount,
        is_valid: true,
        points,
    }
}

async fn tx_contribution<C: ChainIndex>(
    resolver: &EvidenceResolver<'_, C>,
    tx: &TransactionRecord,
    wallet_address: &str,
    target: &ValidatorTarget,
) -> Result<i128> {
    let utxos = resolver.wallet_utxos(&tx.hash, wallet_address).await?;
    match tx.action {
        TxAction::DelegationCreate => {
            let datum = resolver
                .find_delegation_datum(&tx.hash, &utxos.outputs, target)
                .await?;
            Ok(datum.staked as i128)
        }
        TxAction::DelegationDeposit => {
            let redeemer = resolver
                .find_delegation_deposit_redeemer(&tx.hash, target)
                .await?;
            // Non-positive changes are accepted evidence with no contribution
            if redeemer.token_gov_change <= 0 {
                return Ok(0);
            }
            Ok(redeemer.token_gov_change as i128)
        }
        _ => Err(PointsError::NoEvidence(format!(
            "tx {} is not a delegation create or deposit",
            tx.hash
        ))),
    }
}
