//! Invoice-like payment requests.
//!
//! A request is an ask from one company to another. Accepting it settles
//! instantly: the payer spawns the completed sent/received pair, both tagged
//! with the request id, and the request flips to paid.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, Engine, EngineError, ResultEngine, Transaction, TransactionKind, TransactionStatus,
    ensure_positive_amount, transactions,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Paid,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid request status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentRequest {
    pub id: Uuid,
    /// The requester: who the money should go to.
    pub from_company_id: String,
    /// The payer: who is being asked to pay.
    pub to_company_id: String,
    pub amount: f64,
    pub currency: Currency,
    pub due_date: DateTime<Utc>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub from_company_id: String,
    pub to_company_id: String,
    pub amount: f64,
    pub currency: String,
    pub due_date: DateTimeUtc,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentRequest> for ActiveModel {
    fn from(request: &PaymentRequest) -> Self {
        Self {
            id: ActiveValue::Set(request.id.to_string()),
            from_company_id: ActiveValue::Set(request.from_company_id.clone()),
            to_company_id: ActiveValue::Set(request.to_company_id.clone()),
            amount: ActiveValue::Set(request.amount),
            currency: ActiveValue::Set(request.currency.code().to_string()),
            due_date: ActiveValue::Set(request.due_date),
            status: ActiveValue::Set(request.status.as_str().to_string()),
            created_at: ActiveValue::Set(request.created_at),
        }
    }
}

impl TryFrom<Model> for PaymentRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("payment request not exists".to_string()))?,
            from_company_id: model.from_company_id,
            to_company_id: model.to_company_id,
            amount: model.amount,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            due_date: model.due_date,
            status: RequestStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}

/// Command for creating a payment request.
#[derive(Clone, Debug)]
pub struct PaymentRequestCmd {
    pub from_company_id: String,
    /// Payer address; an unknown email gets a directory stub created on the
    /// fly.
    pub to_email: String,
    pub to_company_name: Option<String>,
    pub amount: f64,
    pub currency: Currency,
    pub due_date: DateTime<Utc>,
}

impl Engine {
    /// Creates a pending payment request addressed to the company behind
    /// `cmd.to_email`.
    pub async fn create_payment_request(
        &self,
        cmd: PaymentRequestCmd,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        ensure_positive_amount(cmd.amount)?;
        let payer = self
            .ensure_company_by_email(&cmd.to_email, cmd.to_company_name.as_deref())
            .await?;
        if payer.id.to_string() == cmd.from_company_id {
            return Err(EngineError::InvalidAmount(
                "cannot request a payment from the requesting company".to_string(),
            ));
        }

        let request = PaymentRequest {
            id: Uuid::new_v4(),
            from_company_id: cmd.from_company_id,
            to_company_id: payer.id.to_string(),
            amount: cmd.amount,
            currency: cmd.currency,
            due_date: cmd.due_date,
            status: RequestStatus::Pending,
            created_at: now,
        };
        ActiveModel::from(&request).insert(&self.database).await?;
        Ok(request.id)
    }

    /// Returns a payment request, scoped to one of the two companies on it.
    pub async fn payment_request(
        &self,
        request_id: Uuid,
        company_id: &str,
    ) -> ResultEngine<PaymentRequest> {
        let request = self.load_request(request_id).await?;
        if request.from_company_id != company_id && request.to_company_id != company_id {
            return Err(EngineError::KeyNotFound(
                "payment request not exists".to_string(),
            ));
        }
        Ok(request)
    }

    /// Lists the requests where the company is requester or payer, newest
    /// first.
    pub async fn payment_requests_for_company(
        &self,
        company_id: &str,
    ) -> ResultEngine<Vec<PaymentRequest>> {
        let models = Entity::find()
            .filter(
                Condition::any()
                    .add(Column::FromCompanyId.eq(company_id))
                    .add(Column::ToCompanyId.eq(company_id)),
            )
            .order_by_desc(Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(PaymentRequest::try_from).collect()
    }

    /// Accepts a request as the payer: spawns the completed sent/received
    /// pair tagged with the request id and marks the request paid.
    ///
    /// The payer must cover the amount; a request that was already paid
    /// cannot be paid twice.
    pub async fn accept_payment_request(
        &self,
        request_id: Uuid,
        payer_company_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let request = self.load_request(request_id).await?;
        if request.to_company_id != payer_company_id {
            return Err(EngineError::KeyNotFound(
                "payment request not exists".to_string(),
            ));
        }
        if request.status == RequestStatus::Paid {
            return Err(EngineError::InvalidStatus(
                "payment request already paid".to_string(),
            ));
        }

        let balance = self.balance(payer_company_id, true, now).await?;
        if request.amount > balance {
            return Err(EngineError::InsufficientFunds(payer_company_id.to_string()));
        }

        let mut sent = Transaction::new(
            TransactionKind::PaymentSent {
                request_id: Some(request.id),
                network_fee: None,
            },
            request.amount,
            request.currency,
            None,
            payer_company_id.to_string(),
            Some(request.from_company_id.clone()),
            TransactionStatus::Completed,
            now,
        )?;
        sent.description = Some("Payment request accepted".to_string());

        let received = Transaction::new(
            TransactionKind::PaymentReceived {
                request_id: Some(request.id),
            },
            request.amount,
            request.currency,
            None,
            payer_company_id.to_string(),
            Some(request.from_company_id.clone()),
            TransactionStatus::Completed,
            now,
        )?;

        transactions::ActiveModel::from(&sent)
            .insert(&self.database)
            .await?;
        transactions::ActiveModel::from(&received)
            .insert(&self.database)
            .await?;

        self.set_request_status(request.id, RequestStatus::Paid)
            .await?;
        Ok(sent.id)
    }

    /// Rejects a pending request as the payer.
    pub async fn reject_payment_request(
        &self,
        request_id: Uuid,
        payer_company_id: &str,
    ) -> ResultEngine<()> {
        let request = self.load_request(request_id).await?;
        if request.to_company_id != payer_company_id {
            return Err(EngineError::KeyNotFound(
                "payment request not exists".to_string(),
            ));
        }
        if request.status != RequestStatus::Pending {
            return Err(EngineError::InvalidStatus(
                "only a pending request can be rejected".to_string(),
            ));
        }

        self.set_request_status(request.id, RequestStatus::Rejected)
            .await
    }

    async fn load_request(&self, request_id: Uuid) -> ResultEngine<PaymentRequest> {
        let model = Entity::find_by_id(request_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment request not exists".to_string()))?;
        PaymentRequest::try_from(model)
    }

    async fn set_request_status(&self, request_id: Uuid, status: RequestStatus) -> ResultEngine<()> {
        let update = ActiveModel {
            id: ActiveValue::Set(request_id.to_string()),
            status: ActiveValue::Set(status.as_str().to_string()),
            ..Default::default()
        };
        update.update(&self.database).await?;
        Ok(())
    }
}
