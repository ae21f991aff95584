pub mod add_on;
pub mod category;
pub mod company;
pub mod order_type;
pub mod outlet;
pub mod user;

pub use add_on::{AddOn, AddOnInput};
pub use category::{Category, CategoryInput};
pub use company::{Company, NewCompany};
pub use order_type::{OrderType, OrderTypeInput};
pub use outlet::{Outlet, OutletInput};
pub use user::{NewUser, User, UserRole};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::ListTarget;

/// A row that belongs to exactly one company and can be listed page by page.
pub trait TenantScoped: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Every allow-list must contain `created_at`.
    const SORTABLE: &'static [&'static str];
    const SEARCH_COLUMN: &'static str = "name";
    /// Human name used in not-found messages.
    const LABEL: &'static str;

    fn list_target() -> ListTarget {
        ListTarget {
            table: Self::TABLE,
            columns: Self::COLUMNS,
            sortable: Self::SORTABLE,
            search_column: Self::SEARCH_COLUMN,
        }
    }
}

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{} is required", field)));
    }
    Ok(())
}

/// Blank optional text is stored as NULL.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Create and full-replace for a tenant-scoped entity.
#[async_trait]
pub trait TenantWritable: TenantScoped {
    type Input: DeserializeOwned + Send + Sync + 'static;

    fn validate(input: &Self::Input) -> Result<(), ValidationError>;

    async fn insert(pool: &PgPool, company_id: Uuid, input: &Self::Input) -> Result<Self, DatabaseError>;

    /// Returns `None` when no row with `id` exists for `company_id`.
    async fn update(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        input: &Self::Input,
    ) -> Result<Option<Self>, DatabaseError>;
}
