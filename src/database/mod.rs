pub mod accounts;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use accounts::{AccountScope, AccountStore, PgAccountStore};
pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Repository;
