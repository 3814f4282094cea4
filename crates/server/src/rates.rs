//! Exchange-rate lookups against public price APIs.

use std::collections::HashMap;

use api_types::rate::{RateQuery, RateQuoteView};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::Currency;
use serde::Deserialize;

use crate::{ServerError, currency_to_engine, server::ServerState};

/// A quote: the value of one unit of a currency in base units.
///
/// `resolved` distinguishes a confirmed rate from the 1:1 fallback used when
/// no source could answer, so callers can tell "par" from "unknown".
#[derive(Clone, Copy, Debug)]
pub struct RateQuote {
    pub rate: f64,
    pub resolved: bool,
}

#[derive(Clone, Debug)]
pub struct RateClient {
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct FiatRates {
    rates: HashMap<String, f64>,
}

impl RateClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Value of one `currency` unit in `base` units.
    ///
    /// Falls back to an unresolved par quote on any transport or data error:
    /// a rate outage degrades to "assume 1:1" instead of failing the payment
    /// flow, and the flag lets callers surface the difference.
    pub async fn quote(&self, currency: Currency, base: Currency) -> RateQuote {
        if currency == base || (currency.is_stable() && base.is_stable()) {
            return RateQuote {
                rate: 1.0,
                resolved: true,
            };
        }

        match self.lookup(currency, base).await {
            Ok(Some(rate)) => RateQuote {
                rate,
                resolved: true,
            },
            Ok(None) => {
                tracing::warn!("no rate for {currency} in {base}, defaulting to par");
                RateQuote {
                    rate: 1.0,
                    resolved: false,
                }
            }
            Err(err) => {
                tracing::warn!("rate lookup for {currency} failed: {err}");
                RateQuote {
                    rate: 1.0,
                    resolved: false,
                }
            }
        }
    }

    async fn lookup(&self, currency: Currency, base: Currency) -> Result<Option<f64>, reqwest::Error> {
        if base == Currency::Usd {
            if let Some(id) = coingecko_id(currency) {
                let url = format!(
                    "https://api.coingecko.com/api/v3/simple/price?ids={id}&vs_currencies=usd"
                );
                let prices: HashMap<String, HashMap<String, f64>> =
                    self.http.get(url).send().await?.json().await?;
                return Ok(prices.get(id).and_then(|entry| entry.get("usd")).copied());
            }
        }

        // The fiat API answers "one base unit is worth X in `currency`";
        // invert to get the value of one unit in base.
        let url = format!("https://open.er-api.com/v6/latest/{}", base.code());
        let fiat: FiatRates = self.http.get(url).send().await?.json().await?;
        Ok(fiat
            .rates
            .get(currency.code())
            .filter(|rate| **rate != 0.0)
            .map(|rate| 1.0 / rate))
    }
}

impl Default for RateClient {
    fn default() -> Self {
        Self::new()
    }
}

fn coingecko_id(currency: Currency) -> Option<&'static str> {
    match currency {
        Currency::Eth => Some("ethereum"),
        Currency::Btc => Some("bitcoin"),
        Currency::Sol => Some("solana"),
        Currency::Usd | Currency::Usdc | Currency::Eur => None,
    }
}

pub async fn get(
    State(state): State<ServerState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<RateQuoteView>, ServerError> {
    let base = query.base.unwrap_or(api_types::Currency::Usd);
    let quote = state
        .rates
        .quote(currency_to_engine(query.currency), currency_to_engine(base))
        .await;

    Ok(Json(RateQuoteView {
        currency: query.currency,
        base,
        rate: quote.rate,
        resolved: quote.resolved,
    }))
}
