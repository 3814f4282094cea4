use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
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

pub mod company {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyNew {
        pub name: String,
        pub email: String,
        pub wallet_address: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub wallet_address: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyCreated {
        pub id: Uuid,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceQuery {
        pub company_id: String,
        /// Run the settlement sweep before reading. Defaults to true.
        pub settle: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub company_id: String,
        /// Balance in base units.
        pub balance: f64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Deposit,
        Withdrawal,
        PaymentSent,
        PaymentReceived,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Pending,
        Completed,
        Failed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub company_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount: f64,
        pub currency: Currency,
        pub exchange_rate: Option<f64>,
        pub from_company_id: String,
        pub to_company_id: Option<String>,
        pub status: TransactionStatus,
        /// RFC3339 timestamp, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
        pub scheduled_for: Option<DateTime<FixedOffset>>,
        pub description: Option<String>,
        pub request_id: Option<Uuid>,
        /// Base-unit fee; only ever present on outgoing kinds.
        pub network_fee: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SendPaymentNew {
        pub from_company_id: String,
        pub to_email: String,
        pub amount: f64,
        pub currency: Currency,
        pub description: Option<String>,
        /// When set, the payment is scheduled instead of executed now.
        pub scheduled_for: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub company_id: String,
        pub amount: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WithdrawNew {
        pub company_id: String,
        pub amount: f64,
        pub destination_address: String,
    }
}

pub mod payment_request {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RequestStatus {
        Pending,
        Accepted,
        Rejected,
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentRequestNew {
        pub from_company_id: String,
        pub to_email: String,
        pub to_company_name: Option<String>,
        pub amount: f64,
        pub currency: Currency,
        pub due_date: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentRequestView {
        pub id: Uuid,
        pub from_company_id: String,
        pub to_company_id: String,
        pub amount: f64,
        pub currency: Currency,
        pub due_date: DateTime<FixedOffset>,
        pub status: RequestStatus,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentRequestListQuery {
        pub company_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentRequestListResponse {
        pub requests: Vec<PaymentRequestView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentRequestCreated {
        pub id: Uuid,
    }

    /// Body for accept/reject: the acting (paying) company.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestDecision {
        pub company_id: String,
    }
}

pub mod rate {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RateQuery {
        pub currency: Currency,
        /// Defaults to USD.
        pub base: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RateQuoteView {
        pub currency: Currency,
        pub base: Currency,
        /// Value of one `currency` unit in `base` units.
        pub rate: f64,
        /// False when no source could answer and the rate fell back to par.
        pub resolved: bool,
    }
}
