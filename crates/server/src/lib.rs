use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use rates::{RateClient, RateQuote};
pub use server::{run, run_with_listener, spawn_with_listener};

mod balance;
mod companies;
mod funds;
mod payments;
mod rates;
mod requests;
mod server;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidStatus(_)
        | EngineError::CurrencyMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            // Storage failures must not leak a partial balance or internals;
            // the caller only learns the read was unavailable.
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

pub(crate) fn currency_to_engine(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Usdc => engine::Currency::Usdc,
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Eth => engine::Currency::Eth,
        api_types::Currency::Btc => engine::Currency::Btc,
        api_types::Currency::Sol => engine::Currency::Sol,
    }
}

pub(crate) fn currency_to_api(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Usdc => api_types::Currency::Usdc,
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Eth => api_types::Currency::Eth,
        engine::Currency::Btc => api_types::Currency::Btc,
        engine::Currency::Sol => api_types::Currency::Sol,
    }
}
