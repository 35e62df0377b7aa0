//! Infrastructure layer - database access and transaction handling.

mod db;
mod memory;
pub mod migrations;
mod unit_of_work;

pub use db::Database;
pub use memory::MemoryUnitOfWork;
pub use migrations::Migrator;
pub use unit_of_work::{in_transaction, Persistence, Transaction, TransactionContext, UnitOfWork};
