//! Funding endpoints: deposits in, withdrawals out.

use api_types::transaction::{DepositNew, TransactionCreated, WithdrawNew};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{ServerError, server::ServerState};

pub async fn deposit(
    State(state): State<ServerState>,
    Json(payload): Json<DepositNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .deposit(&payload.company_id, payload.amount, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn withdraw(
    State(state): State<ServerState>,
    Json(payload): Json<WithdrawNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .withdraw(
            &payload.company_id,
            payload.amount,
            &payload.destination_address,
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}
