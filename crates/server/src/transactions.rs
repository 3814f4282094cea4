//! Transactions API endpoints

use api_types::transaction::{
    TransactionKind as ApiKind, TransactionListQuery, TransactionListResponse,
    TransactionStatus as ApiStatus, TransactionView,
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::FixedOffset;

use crate::{ServerError, currency_to_api, server::ServerState};

fn map_kind(kind: &engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Deposit => ApiKind::Deposit,
        engine::TransactionKind::Withdrawal { .. } => ApiKind::Withdrawal,
        engine::TransactionKind::PaymentSent { .. } => ApiKind::PaymentSent,
        engine::TransactionKind::PaymentReceived { .. } => ApiKind::PaymentReceived,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Completed => ApiStatus::Completed,
        engine::TransactionStatus::Failed => ApiStatus::Failed,
    }
}

pub(crate) fn map_transaction(tx: engine::Transaction, utc: FixedOffset) -> TransactionView {
    let kind = map_kind(&tx.kind);
    let request_id = tx.kind.request_id();
    let network_fee = tx.kind.network_fee();

    TransactionView {
        id: tx.id,
        kind,
        amount: tx.amount,
        currency: currency_to_api(tx.currency),
        exchange_rate: tx.exchange_rate,
        from_company_id: tx.from_company_id,
        to_company_id: tx.to_company_id,
        status: map_status(tx.status),
        created_at: tx.created_at.with_timezone(&utc),
        scheduled_for: tx.scheduled_for.map(|at| at.with_timezone(&utc)),
        description: tx.description,
        request_id,
        network_fee,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let txs = state
        .engine
        .transactions_for_company(&query.company_id)
        .await?;

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    let transactions = txs.into_iter().map(|tx| map_transaction(tx, utc)).collect();

    Ok(Json(TransactionListResponse { transactions }))
}
