//! Create the `income_record` table.
//!
//! One flat collection; no relationships to other tables.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IncomeRecord::Table)
                    .if_not_exists()
                    .col(uuid(IncomeRecord::Id).primary_key())
                    .col(string_len(IncomeRecord::Description, 100).not_null())
                    .col(double(IncomeRecord::Amount).not_null())
                    .col(timestamp_with_time_zone(IncomeRecord::Date).not_null())
                    .col(string_len(IncomeRecord::Category, 32).not_null())
                    .col(timestamp_with_time_zone(IncomeRecord::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(IncomeRecord::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(IncomeRecord::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum IncomeRecord { Table, Id, Description, Amount, Date, Category, CreatedAt, UpdatedAt }
