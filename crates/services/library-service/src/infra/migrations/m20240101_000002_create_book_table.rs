//! Migration: Create book table with its owner reference.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_person_table::Person;
use domain::MAX_TEXT_LENGTH;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Book::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Book::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Book::PersonId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Book::Title)
                            .string_len(MAX_TEXT_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Book::Author)
                            .string_len(MAX_TEXT_LENGTH)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Book::PageCount).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_person_id")
                            .from(Book::Table, Book::PersonId)
                            .to(Person::Table, Person::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Owner lookups back get/delete user-with-books
        manager
            .create_index(
                Index::create()
                    .name("idx_book_person_id")
                    .table(Book::Table)
                    .col(Book::PersonId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_book_person_id")
                    .table(Book::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Book::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Book {
    Table,
    Id,
    PersonId,
    Title,
    Author,
    PageCount,
}
