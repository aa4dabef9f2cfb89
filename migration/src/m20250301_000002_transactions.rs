//! transactions 表迁移
//!
//! 收入/支出流水。tags 以 JSON 数组文本存储。

use sea_orm_migration::prelude::*;

use crate::m20250301_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

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
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UserId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TxType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Transactions::Category)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Description).text().not_null())
                    .col(
                        ColumnDef::new(Transactions::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Tags).text().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 列表按 user + date 倒序，聚合也按这两列过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_user_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        // 预算已花费查询：user + category + type
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_user_category")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Category)
                    .col(Transactions::TxType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transactions_user_category")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_transactions_user_date").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    TxType,
    Amount,
    Category,
    Description,
    Date,
    Tags,
    CreatedAt,
}
