//! Balance API endpoint.

use api_types::balance::{BalanceQuery, BalanceView};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::{ServerError, server::ServerState};

pub async fn get(
    State(state): State<ServerState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceView>, ServerError> {
    let settle = query.settle.unwrap_or(true);
    let balance = state
        .engine
        .balance(&query.company_id, settle, Utc::now())
        .await?;

    Ok(Json(BalanceView {
        company_id: query.company_id,
        balance,
    }))
}
