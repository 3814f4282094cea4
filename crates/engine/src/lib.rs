use sea_orm::DatabaseConnection;

pub use companies::Company;
pub use currency::Currency;
pub use error::EngineError;
pub use ledger::calculate_balance;
pub use payment_requests::{PaymentRequest, PaymentRequestCmd, RequestStatus};
pub use settlement::is_payment_due;
pub use transactions::{
    EXTERNAL_FUNDING_ID, SendPaymentCmd, Transaction, TransactionKind, TransactionStatus,
    WITHDRAWAL_NETWORK_FEE,
};
pub use wallets::Wallet;

mod balances;
mod companies;
mod currency;
mod error;
mod ledger;
mod payment_requests;
mod settlement;
mod transactions;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;

fn ensure_positive_amount(amount: f64) -> ResultEngine<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount(
            "amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// The ledger engine.
///
/// All state lives in the database; the engine itself only carries the
/// connection, so it is cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
