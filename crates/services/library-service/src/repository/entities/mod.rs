//! SeaORM entities for the relational backend.

pub mod book;
pub mod person;
