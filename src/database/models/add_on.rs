use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{require_text, TenantScoped, TenantWritable, ValidationError};
use crate::database::manager::DatabaseError;

/// Optional extra sold alongside a product (extra shot, topping).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AddOn {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddOnInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

const RETURNING: &str = "id, company_id, name, price, is_active, created_at, updated_at";

impl TenantScoped for AddOn {
    const TABLE: &'static str = "add_ons";
    const COLUMNS: &'static [&'static str] =
        &["id", "company_id", "name", "price", "is_active", "created_at", "updated_at"];
    const SORTABLE: &'static [&'static str] = &["name", "created_at", "updated_at"];
    const LABEL: &'static str = "Add-on";
}

#[async_trait]
impl TenantWritable for AddOn {
    type Input = AddOnInput;

    fn validate(input: &AddOnInput) -> Result<(), ValidationError> {
        require_text("name", &input.name)?;
        if input.price.is_sign_negative() {
            return Err(ValidationError::new("price", "price must not be negative"));
        }
        Ok(())
    }

    async fn insert(pool: &PgPool, company_id: Uuid, input: &AddOnInput) -> Result<Self, DatabaseError> {
        let sql = format!(
            "INSERT INTO add_ons (company_id, name, price, is_active) VALUES ($1, $2, $3, $4) RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, AddOn>(&sql)
            .bind(company_id)
            .bind(input.name.trim())
            .bind(input.price)
            .bind(input.is_active)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    async fn update(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        input: &AddOnInput,
    ) -> Result<Option<Self>, DatabaseError> {
        let sql = format!(
            "UPDATE add_ons SET name = $1, price = $2, is_active = $3, updated_at = NOW() \
             WHERE id = $4 AND company_id = $5 RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, AddOn>(&sql)
            .bind(input.name.trim())
            .bind(input.price)
            .bind(input.is_active)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
