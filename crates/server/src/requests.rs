//! Payment request endpoints.

use api_types::{
    payment_request::{
        PaymentRequestCreated, PaymentRequestListQuery, PaymentRequestListResponse,
        PaymentRequestNew, PaymentRequestView, RequestDecision, RequestStatus as ApiStatus,
    },
    transaction::TransactionCreated,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use uuid::Uuid;

use crate::{ServerError, currency_to_api, currency_to_engine, server::ServerState};

fn map_status(status: engine::RequestStatus) -> ApiStatus {
    match status {
        engine::RequestStatus::Pending => ApiStatus::Pending,
        engine::RequestStatus::Accepted => ApiStatus::Accepted,
        engine::RequestStatus::Rejected => ApiStatus::Rejected,
        engine::RequestStatus::Paid => ApiStatus::Paid,
    }
}

fn map_request(request: engine::PaymentRequest, utc: FixedOffset) -> PaymentRequestView {
    PaymentRequestView {
        id: request.id,
        from_company_id: request.from_company_id,
        to_company_id: request.to_company_id,
        amount: request.amount,
        currency: currency_to_api(request.currency),
        due_date: request.due_date.with_timezone(&utc),
        status: map_status(request.status),
        created_at: request.created_at.with_timezone(&utc),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentRequestNew>,
) -> Result<(StatusCode, Json<PaymentRequestCreated>), ServerError> {
    let id = state
        .engine
        .create_payment_request(
            engine::PaymentRequestCmd {
                from_company_id: payload.from_company_id,
                to_email: payload.to_email,
                to_company_name: payload.to_company_name,
                amount: payload.amount,
                currency: currency_to_engine(payload.currency),
                due_date: payload.due_date.with_timezone(&Utc),
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentRequestCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PaymentRequestListQuery>,
) -> Result<Json<PaymentRequestListResponse>, ServerError> {
    let requests = state
        .engine
        .payment_requests_for_company(&query.company_id)
        .await?;

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    let requests = requests
        .into_iter()
        .map(|request| map_request(request, utc))
        .collect();

    Ok(Json(PaymentRequestListResponse { requests }))
}

pub async fn accept(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RequestDecision>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let sent_id = state
        .engine
        .accept_payment_request(id, &payload.company_id, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id: sent_id })))
}

pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RequestDecision>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .reject_payment_request(id, &payload.company_id)
        .await?;

    Ok(StatusCode::OK)
}
