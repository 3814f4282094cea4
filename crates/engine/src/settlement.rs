//! Time-driven settlement of scheduled payments.
//!
//! Settlement is monotonic: the only transition is pending to completed, and
//! a completed row is never revisited. That makes the sweep idempotent and
//! safe to run on every balance query without a separate timer.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, Condition, QueryFilter, entity::prelude::*};
use uuid::Uuid;

use crate::{Engine, ResultEngine, Transaction, TransactionStatus, transactions};

/// Returns `true` when a scheduled transaction is ready to settle: it is
/// still pending and its scheduled time has passed.
#[must_use]
pub fn is_payment_due(tx: &Transaction, now: DateTime<Utc>) -> bool {
    tx.status == TransactionStatus::Pending && tx.scheduled_for.is_some_and(|due| due <= now)
}

impl Engine {
    /// Settles every scheduled transaction that is due at `now`, returning
    /// the ids that were updated.
    ///
    /// The due set comes from an indexed range scan on
    /// `(status, scheduled_for)` rather than a walk over the whole table.
    /// Each hit gets a status-only update, so an overlapping sweep writing
    /// the same row is harmless. A row that fails to update is logged and
    /// skipped; it stays pending and the next sweep picks it up again.
    pub async fn process_scheduled_payments(&self, now: DateTime<Utc>) -> ResultEngine<Vec<Uuid>> {
        let due: Vec<transactions::Model> = transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending.as_str()))
            .filter(transactions::Column::ScheduledFor.lte(now))
            .all(&self.database)
            .await?;

        let mut processed = Vec::with_capacity(due.len());
        for model in due {
            let update = transactions::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                status: ActiveValue::Set(TransactionStatus::Completed.as_str().to_string()),
                ..Default::default()
            };
            if let Err(err) = update.update(&self.database).await {
                tracing::warn!("failed to settle scheduled transaction {}: {err}", model.id);
                continue;
            }
            match Uuid::parse_str(&model.id) {
                Ok(id) => processed.push(id),
                Err(_) => {
                    tracing::warn!("settled transaction {} has a non-uuid id", model.id);
                }
            }
        }

        Ok(processed)
    }

    /// Lists the due scheduled transactions where the company is the sender
    /// or the recipient. Read-only; the sweep is what settles them.
    pub async fn due_scheduled_payments(
        &self,
        company_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::FromCompanyId.eq(company_id))
                    .add(transactions::Column::ToCompanyId.eq(company_id)),
            )
            .all(&self.database)
            .await?;

        let mut due = Vec::new();
        for model in models {
            let tx = Transaction::try_from(model)?;
            if is_payment_due(&tx, now) {
                due.push(tx);
            }
        }
        Ok(due)
    }
}
