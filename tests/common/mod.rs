#![allow(dead_code)]

use anyhow::{Context, Result};
use pos_api::database::accounts::insert_company;
use pos_api::database::models::NewCompany;
use pos_api::database::DatabaseManager;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

/// Pool against `TEST_DATABASE_URL` with migrations applied, or `None` when
/// no test database is configured (the calling test then returns early).
pub async fn test_pool() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .context("failed to connect to TEST_DATABASE_URL")?;
    DatabaseManager::run_migrations(&pool).await?;
    Ok(Some(pool))
}

/// Collision-free name so concurrent and repeated runs never share rows.
pub fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

pub async fn seed_company(pool: &PgPool) -> Result<Uuid> {
    let company = insert_company(pool, &NewCompany { name: unique("company") }).await?;
    Ok(company.id)
}

pub async fn count_where(pool: &PgPool, table: &str, column: &str, value: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = $1", table, column);
    let count: i64 = sqlx::query_scalar(&sql).bind(value).fetch_one(pool).await?;
    Ok(count)
}
