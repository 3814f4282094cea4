use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum PaymentRequests {
    Table,
    Id,
    FromCompanyId,
    ToCompanyId,
    Amount,
    Currency,
    DueDate,
    Status,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentRequests::FromCompanyId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentRequests::ToCompanyId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentRequests::Amount).double().not_null())
                    .col(
                        ColumnDef::new(PaymentRequests::Currency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentRequests::DueDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(PaymentRequests::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_requests-from_company_id")
                    .table(PaymentRequests::Table)
                    .col(PaymentRequests::FromCompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_requests-to_company_id")
                    .table(PaymentRequests::Table)
                    .col(PaymentRequests::ToCompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_requests-status")
                    .table(PaymentRequests::Table)
                    .col(PaymentRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentRequests::Table).to_owned())
            .await
    }
}
