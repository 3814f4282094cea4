use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Currency code attached to transaction amounts and rate quotes.
///
/// Balances are always denominated in the base currency (`USD`); any other
/// currency enters the ledger together with an exchange rate converting it to
/// base units at transaction time. A missing rate folds as 1:1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Usdc,
    Eur,
    Eth,
    Btc,
    Sol,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Usdc => "USDC",
            Currency::Eur => "EUR",
            Currency::Eth => "ETH",
            Currency::Btc => "BTC",
            Currency::Sol => "SOL",
        }
    }

    /// Whether amounts in this currency trade at par with base units.
    #[must_use]
    pub const fn is_stable(self) -> bool {
        matches!(self, Currency::Usd | Currency::Usdc)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "USDC" => Ok(Currency::Usdc),
            "EUR" => Ok(Currency::Eur),
            "ETH" => Ok(Currency::Eth),
            "BTC" => Ok(Currency::Btc),
            "SOL" => Ok(Currency::Sol),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
