//! Person database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{stored_count, Person};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "person")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub full_name: String,
    pub title: String,
    pub age: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Person {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let age = stored_count("age", model.age)?;

        Ok(Person {
            id: Some(model.id),
            full_name: model.full_name,
            title: model.title,
            age,
            status: model.status,
        })
    }
}
