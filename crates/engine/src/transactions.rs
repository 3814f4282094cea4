//! Transaction primitives and the write paths that create them.
//!
//! A `Transaction` is a single-entry ledger row: its kind determines the sign
//! of its economic effect, and [`crate::calculate_balance`] folds the
//! completed rows into a balance. Rows are immutable once completed; only the
//! settlement sweep rewrites a pending row, and only its status.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, Engine, EngineError, ResultEngine, ensure_positive_amount};

/// Sentinel sender id for funds entering the platform from outside (bank
/// transfer, card top-up). Not a real company id.
pub const EXTERNAL_FUNDING_ID: &str = "external";

/// Flat fee, in base units, charged on withdrawals to an external address.
pub const WITHDRAWAL_NETWORK_FEE: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

/// Transaction kind, tagged with the fields that only make sense for it.
///
/// Network fees exist on outgoing kinds only: the payer bears all fees, so an
/// incoming row has no slot for one. Fees are denominated directly in base
/// units and are never multiplied by the exchange rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal {
        network_fee: Option<f64>,
        destination_address: Option<String>,
    },
    PaymentSent {
        request_id: Option<Uuid>,
        network_fee: Option<f64>,
    },
    PaymentReceived {
        request_id: Option<Uuid>,
    },
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal { .. } => "withdrawal",
            Self::PaymentSent { .. } => "payment_sent",
            Self::PaymentReceived { .. } => "payment_received",
        }
    }

    /// Fee charged on top of the base-unit value, if any.
    pub fn network_fee(&self) -> Option<f64> {
        match self {
            Self::Withdrawal { network_fee, .. } | Self::PaymentSent { network_fee, .. } => {
                *network_fee
            }
            Self::Deposit | Self::PaymentReceived { .. } => None,
        }
    }

    /// Payment request this row settles, when it originated from one.
    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            Self::PaymentSent { request_id, .. } | Self::PaymentReceived { request_id } => {
                *request_id
            }
            Self::Deposit | Self::Withdrawal { .. } => None,
        }
    }

    fn destination_address(&self) -> Option<&str> {
        match self {
            Self::Withdrawal {
                destination_address,
                ..
            } => destination_address.as_deref(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    /// Amount in `currency` units, positive by construction.
    pub amount: f64,
    pub currency: Currency,
    /// Value of one unit of `currency` in base units at transaction time.
    /// Absent means the rate was never resolved; the ledger folds it as 1.
    pub exchange_rate: Option<f64>,
    pub from_company_id: String,
    pub to_company_id: Option<String>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    /// Future settlement time. A pending row with a past `scheduled_for` is
    /// due and will be completed by the next sweep.
    pub scheduled_for: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        currency: Currency,
        exchange_rate: Option<f64>,
        from_company_id: String,
        to_company_id: Option<String>,
        status: TransactionStatus,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        ensure_positive_amount(amount)?;
        if to_company_id.as_deref() == Some(from_company_id.as_str()) {
            return Err(EngineError::InvalidAmount(
                "from_company_id and to_company_id must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            currency,
            exchange_rate,
            from_company_id,
            to_company_id,
            status,
            created_at,
            scheduled_for: None,
            description: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount: f64,
    pub currency: String,
    pub exchange_rate: Option<f64>,
    pub from_company_id: String,
    pub to_company_id: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub scheduled_for: Option<DateTimeUtc>,
    pub description: Option<String>,
    pub request_id: Option<String>,
    pub network_fee: Option<f64>,
    pub destination_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount: ActiveValue::Set(tx.amount),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            exchange_rate: ActiveValue::Set(tx.exchange_rate),
            from_company_id: ActiveValue::Set(tx.from_company_id.clone()),
            to_company_id: ActiveValue::Set(tx.to_company_id.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            created_at: ActiveValue::Set(tx.created_at),
            scheduled_for: ActiveValue::Set(tx.scheduled_for),
            description: ActiveValue::Set(tx.description.clone()),
            request_id: ActiveValue::Set(tx.kind.request_id().map(|id| id.to_string())),
            network_fee: ActiveValue::Set(tx.kind.network_fee()),
            destination_address: ActiveValue::Set(
                tx.kind.destination_address().map(ToString::to_string),
            ),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let request_id = model
            .request_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok());
        // A fee column on an incoming row has no domain slot: the payer bears
        // all fees, so it is dropped here.
        let kind = match model.kind.as_str() {
            "deposit" => TransactionKind::Deposit,
            "withdrawal" => TransactionKind::Withdrawal {
                network_fee: model.network_fee,
                destination_address: model.destination_address.clone(),
            },
            "payment_sent" => TransactionKind::PaymentSent {
                request_id,
                network_fee: model.network_fee,
            },
            "payment_received" => TransactionKind::PaymentReceived { request_id },
            other => {
                return Err(EngineError::InvalidStatus(format!(
                    "invalid transaction kind: {other}"
                )));
            }
        };

        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            kind,
            amount: model.amount,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            exchange_rate: model.exchange_rate,
            from_company_id: model.from_company_id,
            to_company_id: model.to_company_id,
            status: TransactionStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            scheduled_for: model.scheduled_for,
            description: model.description,
        })
    }
}

/// Command for creating an outgoing payment.
#[derive(Clone, Debug)]
pub struct SendPaymentCmd {
    pub from_company_id: String,
    /// Recipient address; an unknown email gets a directory stub created on
    /// the fly.
    pub to_email: String,
    pub amount: f64,
    pub currency: Currency,
    /// Resolved base-unit rate for `currency`, `None` when the quote could
    /// not be confirmed (folds as 1:1).
    pub exchange_rate: Option<f64>,
    pub description: Option<String>,
    /// Settle at this time instead of immediately.
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl Engine {
    /// Records an instant deposit from the external funding source and makes
    /// sure the company has a wallet to anchor its balance reads.
    pub async fn deposit(
        &self,
        company_id: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let mut tx = Transaction::new(
            TransactionKind::Deposit,
            amount,
            Currency::Usdc,
            None,
            EXTERNAL_FUNDING_ID.to_string(),
            Some(company_id.to_string()),
            TransactionStatus::Completed,
            now,
        )?;
        tx.description = Some("Bank transfer deposit".to_string());

        ActiveModel::from(&tx).insert(&self.database).await?;
        self.ensure_wallet(company_id, now).await?;
        Ok(tx.id)
    }

    /// Initiates a withdrawal to an external address.
    ///
    /// Withdrawals wait for off-platform approval, so the row is written as
    /// pending and only affects the balance once approved. The flat network
    /// fee is recorded up front, in base units.
    pub async fn withdraw(
        &self,
        company_id: &str,
        amount: f64,
        destination_address: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        ensure_positive_amount(amount)?;
        if destination_address.len() < 10 {
            return Err(EngineError::InvalidAmount(
                "destination address is not valid".to_string(),
            ));
        }

        let balance = self.balance(company_id, true, now).await?;
        if amount > balance {
            return Err(EngineError::InsufficientFunds(company_id.to_string()));
        }

        let prefix: String = destination_address.chars().take(6).collect();
        let mut tx = Transaction::new(
            TransactionKind::Withdrawal {
                network_fee: Some(WITHDRAWAL_NETWORK_FEE),
                destination_address: Some(destination_address.to_string()),
            },
            amount,
            Currency::Usdc,
            None,
            company_id.to_string(),
            None,
            TransactionStatus::Pending,
            now,
        )?;
        tx.description = Some(format!("Withdrawal to {prefix}..."));

        ActiveModel::from(&tx).insert(&self.database).await?;
        Ok(tx.id)
    }

    /// Creates an outgoing payment to the company behind `cmd.to_email`.
    ///
    /// Without `scheduled_for` the payment executes immediately: the payer
    /// must cover the base-unit cost and both halves of the transfer are
    /// written as completed. With `scheduled_for` a single pending row is
    /// written and left for the settlement sweep; the balance check is
    /// skipped, funding can arrive before the due date.
    pub async fn send_payment(&self, cmd: SendPaymentCmd, now: DateTime<Utc>) -> ResultEngine<Uuid> {
        ensure_positive_amount(cmd.amount)?;
        let recipient = self.ensure_company_by_email(&cmd.to_email, None).await?;
        if recipient.id.to_string() == cmd.from_company_id {
            return Err(EngineError::InvalidAmount(
                "cannot send a payment to the sending company".to_string(),
            ));
        }

        if let Some(due) = cmd.scheduled_for {
            let mut tx = Transaction::new(
                TransactionKind::PaymentSent {
                    request_id: None,
                    network_fee: None,
                },
                cmd.amount,
                cmd.currency,
                cmd.exchange_rate,
                cmd.from_company_id,
                Some(recipient.id.to_string()),
                TransactionStatus::Pending,
                now,
            )?;
            tx.scheduled_for = Some(due);
            tx.description = cmd.description;

            ActiveModel::from(&tx).insert(&self.database).await?;
            return Ok(tx.id);
        }

        let cost_in_base = cmd.amount * cmd.exchange_rate.unwrap_or(1.0);
        let balance = self.balance(&cmd.from_company_id, true, now).await?;
        if cost_in_base > balance {
            return Err(EngineError::InsufficientFunds(cmd.from_company_id));
        }

        // The receiving half is recorded eagerly; both rows settle at once.
        let mut sent = Transaction::new(
            TransactionKind::PaymentSent {
                request_id: None,
                network_fee: None,
            },
            cmd.amount,
            cmd.currency,
            cmd.exchange_rate,
            cmd.from_company_id.clone(),
            Some(recipient.id.to_string()),
            TransactionStatus::Completed,
            now,
        )?;
        sent.description = cmd.description.clone();

        let mut received = Transaction::new(
            TransactionKind::PaymentReceived { request_id: None },
            cmd.amount,
            cmd.currency,
            cmd.exchange_rate,
            cmd.from_company_id,
            Some(recipient.id.to_string()),
            TransactionStatus::Completed,
            now,
        )?;
        received.description = cmd.description;

        ActiveModel::from(&sent).insert(&self.database).await?;
        ActiveModel::from(&received).insert(&self.database).await?;
        Ok(sent.id)
    }
}
