//! The module contains the `Wallet` struct and its implementation.
//!
//! A wallet holds the cached baseline balance for a company, in base units.
//! It is written once at creation: every later economic effect flows through
//! transactions, so the live balance is always `baseline + fold(rows)`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Currency, Engine, EngineError, ResultEngine};

/// Per-company balance snapshot. Each company has at most one.
#[derive(Clone, Debug, PartialEq)]
pub struct Wallet {
    pub company_id: String,
    /// Baseline balance in base units, fixed at creation.
    pub balance: f64,
    /// Display label only; the baseline itself is always base units.
    pub currency: Currency,
    pub last_updated: DateTime<Utc>,
}

impl Wallet {
    pub fn new(company_id: String, balance: f64, currency: Currency, now: DateTime<Utc>) -> Self {
        Self {
            company_id,
            balance,
            currency,
            last_updated: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: String,
    pub balance: f64,
    pub currency: String,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(wallet: &Wallet) -> Self {
        Self {
            company_id: ActiveValue::Set(wallet.company_id.clone()),
            balance: ActiveValue::Set(wallet.balance),
            currency: ActiveValue::Set(wallet.currency.code().to_string()),
            last_updated: ActiveValue::Set(wallet.last_updated),
        }
    }
}

impl From<Model> for Wallet {
    fn from(model: Model) -> Self {
        Self {
            company_id: model.company_id,
            balance: model.balance,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or(Currency::Usdc),
            last_updated: model.last_updated,
        }
    }
}

impl Engine {
    /// Creates the wallet for a company with the given baseline.
    pub async fn new_wallet(
        &self,
        company_id: &str,
        balance: f64,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if self.wallet(company_id).await?.is_some() {
            return Err(EngineError::ExistingKey(company_id.to_string()));
        }

        let wallet = Wallet::new(company_id.to_string(), balance, currency, now);
        ActiveModel::from(&wallet).insert(&self.database).await?;
        Ok(())
    }

    /// Returns a company's wallet, if it has one.
    pub async fn wallet(&self, company_id: &str) -> ResultEngine<Option<Wallet>> {
        let model = Entity::find_by_id(company_id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(Wallet::from))
    }

    /// Creates a zero-baseline wallet when the company has none yet.
    pub(crate) async fn ensure_wallet(
        &self,
        company_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if self.wallet(company_id).await?.is_none() {
            let wallet = Wallet::new(company_id.to_string(), 0.0, Currency::Usdc, now);
            ActiveModel::from(&wallet).insert(&self.database).await?;
        }
        Ok(())
    }
}
