use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{non_blank, require_text, TenantScoped, TenantWritable, ValidationError};
use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

const RETURNING: &str = "id, company_id, name, description, created_at, updated_at";

impl TenantScoped for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] =
        &["id", "company_id", "name", "description", "created_at", "updated_at"];
    const SORTABLE: &'static [&'static str] = &["name", "created_at", "updated_at"];
    const LABEL: &'static str = "Category";
}

#[async_trait]
impl TenantWritable for Category {
    type Input = CategoryInput;

    fn validate(input: &CategoryInput) -> Result<(), ValidationError> {
        require_text("name", &input.name)
    }

    async fn insert(pool: &PgPool, company_id: Uuid, input: &CategoryInput) -> Result<Self, DatabaseError> {
        let sql = format!(
            "INSERT INTO categories (company_id, name, description) VALUES ($1, $2, $3) RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, Category>(&sql)
            .bind(company_id)
            .bind(input.name.trim())
            .bind(non_blank(&input.description))
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    async fn update(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Option<Self>, DatabaseError> {
        let sql = format!(
            "UPDATE categories SET name = $1, description = $2, updated_at = NOW() \
             WHERE id = $3 AND company_id = $4 RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, Category>(&sql)
            .bind(input.name.trim())
            .bind(non_blank(&input.description))
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
