//! Company directory endpoints.

use api_types::company::{CompanyCreated, CompanyNew, CompanyView};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

fn map_company(company: engine::Company) -> CompanyView {
    CompanyView {
        id: company.id,
        name: company.name,
        email: company.email,
        wallet_address: company.wallet_address,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CompanyView>>, ServerError> {
    let companies = state.engine.companies().await?;
    Ok(Json(companies.into_iter().map(map_company).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CompanyNew>,
) -> Result<(StatusCode, Json<CompanyCreated>), ServerError> {
    let id = state
        .engine
        .new_company(&payload.name, &payload.email, payload.wallet_address)
        .await?;

    Ok((StatusCode::CREATED, Json(CompanyCreated { id })))
}
