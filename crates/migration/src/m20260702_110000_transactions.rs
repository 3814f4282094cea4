use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Kind,
    Amount,
    Currency,
    ExchangeRate,
    FromCompanyId,
    ToCompanyId,
    Status,
    CreatedAt,
    ScheduledFor,
    Description,
    RequestId,
    NetworkFee,
    DestinationAddress,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::Amount).double().not_null())
                    .col(ColumnDef::new(Transactions::Currency).string().not_null())
                    .col(ColumnDef::new(Transactions::ExchangeRate).double())
                    .col(
                        ColumnDef::new(Transactions::FromCompanyId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ToCompanyId).string())
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ScheduledFor).timestamp())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::RequestId).string())
                    .col(ColumnDef::new(Transactions::NetworkFee).double())
                    .col(ColumnDef::new(Transactions::DestinationAddress).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-from_company_id")
                    .table(Transactions::Table)
                    .col(Transactions::FromCompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-to_company_id")
                    .table(Transactions::Table)
                    .col(Transactions::ToCompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // The settlement sweep selects on (status, scheduled_for) as a range
        // scan; keep it indexed so the sweep never walks the whole table.
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-status-scheduled_for")
                    .table(Transactions::Table)
                    .col(Transactions::Status)
                    .col(Transactions::ScheduledFor)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}
