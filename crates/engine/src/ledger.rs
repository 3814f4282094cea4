//! The pure balance fold.

use crate::{Transaction, TransactionKind, TransactionStatus};

/// Folds a set of transactions over a starting balance.
///
/// Only completed transactions have an effect; the order of the slice does
/// not matter. Foreign amounts are converted with the stored exchange rate,
/// defaulting to par when no rate was recorded. Values are plain `f64`, the
/// unit the source data carries; no rounding policy is applied.
#[must_use]
pub fn calculate_balance(initial_balance: f64, transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .fold(initial_balance, |balance, tx| balance + settled_effect(tx))
}

fn settled_effect(tx: &Transaction) -> f64 {
    if tx.status != TransactionStatus::Completed {
        return 0.0;
    }

    let value_in_base = tx.amount * tx.exchange_rate.unwrap_or(1.0);
    match &tx.kind {
        TransactionKind::Deposit | TransactionKind::PaymentReceived { .. } => value_in_base,
        // Fees are quoted directly in base units, never rate-adjusted.
        TransactionKind::Withdrawal { network_fee, .. }
        | TransactionKind::PaymentSent { network_fee, .. } => {
            -value_in_base - network_fee.unwrap_or(0.0)
        }
    }
}
