//! Outgoing payment endpoint.

use api_types::transaction::{SendPaymentNew, TransactionCreated};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{ServerError, currency_to_engine, server::ServerState};

pub async fn send(
    State(state): State<ServerState>,
    Json(payload): Json<SendPaymentNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let currency = currency_to_engine(payload.currency);

    // Quote the live rate up front so the stored row reflects transaction
    // time. An unresolved quote is stored as "no rate" and folds at par.
    let quote = state.rates.quote(currency, engine::Currency::Usd).await;
    let exchange_rate = quote.resolved.then_some(quote.rate);

    let id = state
        .engine
        .send_payment(
            engine::SendPaymentCmd {
                from_company_id: payload.from_company_id,
                to_email: payload.to_email,
                amount: payload.amount,
                currency,
                exchange_rate,
                description: payload.description,
                scheduled_for: payload.scheduled_for.map(|at| at.with_timezone(&Utc)),
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}
