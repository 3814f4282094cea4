//! Balance queries: the settle-then-fold read path.

use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryFilter, QueryOrder, entity::prelude::*};

use crate::{Engine, ResultEngine, Transaction, ledger, transactions};

impl Engine {
    /// All transactions touching a company (as sender or recipient), newest
    /// first. A single filtered query, so a row naming the company on both
    /// sides still appears exactly once.
    pub async fn transactions_for_company(
        &self,
        company_id: &str,
    ) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::FromCompanyId.eq(company_id))
                    .add(transactions::Column::ToCompanyId.eq(company_id)),
            )
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Current balance of a company, in base units.
    ///
    /// With `settle_first` the global settlement sweep runs before the read,
    /// so the result reflects every scheduled payment due at `now`. A company
    /// without a wallet reads from a zero baseline. Any storage failure
    /// surfaces as an error; a partial balance is never returned.
    pub async fn balance(
        &self,
        company_id: &str,
        settle_first: bool,
        now: DateTime<Utc>,
    ) -> ResultEngine<f64> {
        if settle_first {
            self.process_scheduled_payments(now).await?;
        }

        let baseline = self
            .wallet(company_id)
            .await?
            .map_or(0.0, |wallet| wallet.balance);
        let transactions = self.transactions_for_company(company_id).await?;
        Ok(ledger::calculate_balance(baseline, &transactions))
    }
}
