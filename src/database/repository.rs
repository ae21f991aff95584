use std::marker::PhantomData;

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{TenantScoped, TenantWritable};
use crate::database::query_builder;
use crate::filter::{ListQuery, PageRequest, Paginated};

/// Company-scoped access to one entity table. Every statement filters by
/// `company_id`, so a row from another tenant behaves exactly like a missing row.
pub struct Repository<T> {
    pool: PgPool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self { pool: self.pool.clone(), _phantom: PhantomData }
    }
}

impl<T: TenantScoped> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, _phantom: PhantomData }
    }

    /// One page of rows plus the total matching the same filter.
    pub async fn list_paged(&self, company_id: Uuid, request: &PageRequest) -> Result<Paginated<T>, DatabaseError> {
        let query = ListQuery::new(T::list_target(), company_id, request)?;

        let total = query_builder::fetch_count(&self.pool, &query.count_sql()).await?;
        let items = query_builder::fetch_all::<T>(&self.pool, &query.select_sql()).await?;

        debug!(
            "Listed {} of {} rows from {} (page {}, sort {})",
            items.len(),
            total,
            T::TABLE,
            request.page,
            query.sort_column()
        );
        Ok(Paginated { items, total })
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<T, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM \"{}\" WHERE \"id\" = $1 AND \"company_id\" = $2",
            column_list::<T>(),
            T::TABLE
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found::<T>)
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = $1 AND \"company_id\" = $2", T::TABLE);
        let result = sqlx::query(&sql).bind(id).bind(company_id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<T>());
        }
        Ok(())
    }
}

impl<T: TenantWritable> Repository<T> {
    /// Caller validates `input` first.
    pub async fn create(&self, company_id: Uuid, input: &T::Input) -> Result<T, DatabaseError> {
        T::insert(&self.pool, company_id, input).await
    }

    pub async fn update(&self, company_id: Uuid, id: Uuid, input: &T::Input) -> Result<T, DatabaseError> {
        T::update(&self.pool, company_id, id, input)
            .await?
            .ok_or_else(not_found::<T>)
    }
}

fn column_list<T: TenantScoped>() -> String {
    T::COLUMNS
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn not_found<T: TenantScoped>() -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", T::LABEL))
}
