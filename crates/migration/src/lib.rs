pub use sea_orm_migration::prelude::*;

mod m20260702_090000_companies;
mod m20260702_100000_wallets;
mod m20260702_110000_transactions;
mod m20260703_090000_payment_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260702_090000_companies::Migration),
            Box::new(m20260702_100000_wallets::Migration),
            Box::new(m20260702_110000_transactions::Migration),
            Box::new(m20260703_090000_payment_requests::Migration),
        ]
    }
}
