//! Indexes backing the list endpoint's default sort and common filters.
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_income_record::IncomeRecord;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_income_record_date")
                    .table(IncomeRecord::Table)
                    .col(IncomeRecord::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_income_record_category")
                    .table(IncomeRecord::Table)
                    .col(IncomeRecord::Category)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_income_record_amount")
                    .table(IncomeRecord::Table)
                    .col(IncomeRecord::Amount)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_income_record_amount").table(IncomeRecord::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_income_record_category").table(IncomeRecord::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_income_record_date").table(IncomeRecord::Table).to_owned())
            .await
    }
}
