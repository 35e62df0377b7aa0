//! Book database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{stored_count, Book};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner; indexed for lookups by person
    pub person_id: i64,
    pub title: String,
    pub author: String,
    pub page_count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Book {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let page_count = stored_count("page_count", model.page_count)?;

        Ok(Book {
            id: Some(model.id),
            person_id: model.person_id,
            title: model.title,
            author: model.author,
            page_count,
        })
    }
}
