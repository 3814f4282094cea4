use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{RateClient, balance, companies, funds, payments, rates, requests, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub rates: RateClient,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/balance", get(balance::get))
        .route("/transactions", get(transactions::list))
        .route("/payments/send", post(payments::send))
        .route("/funds/deposit", post(funds::deposit))
        .route("/funds/withdraw", post(funds::withdraw))
        .route("/companies", get(companies::list).post(companies::create))
        .route("/requests", get(requests::list).post(requests::create))
        .route("/requests/{id}/accept", post(requests::accept))
        .route("/requests/{id}/reject", post(requests::reject))
        .route("/rates", get(rates::get))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        rates: RateClient::new(),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
