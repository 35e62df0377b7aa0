//! Migration: Create person table.

use sea_orm_migration::prelude::*;

use domain::{MAX_TEXT_LENGTH, STATUS_ACTIVE};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Person::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Person::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Person::FullName)
                            .string_len(MAX_TEXT_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Person::Title)
                            .string_len(MAX_TEXT_LENGTH)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Person::Age).big_integer().not_null())
                    .col(
                        ColumnDef::new(Person::Status)
                            .string_len(MAX_TEXT_LENGTH)
                            .not_null()
                            .default(STATUS_ACTIVE),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Person::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Person {
    Table,
    Id,
    FullName,
    Title,
    Age,
    Status,
}
