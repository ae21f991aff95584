use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{require_text, TenantScoped, TenantWritable, ValidationError};
use crate::database::manager::DatabaseError;

/// Dine-in, takeaway, delivery and similar, with an optional price adjustment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderType {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub is_active_price_adjustment: bool,
    pub price_increase: Decimal,
    pub price_decrease: Decimal,
    pub increase_type: String,
    pub decrease_type: String,
    pub increase_value: Decimal,
    pub decrease_value: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderTypeInput {
    pub name: String,
    pub is_active_price_adjustment: bool,
    pub price_increase: Decimal,
    pub price_decrease: Decimal,
    pub increase_type: String,
    pub decrease_type: String,
    pub increase_value: Decimal,
    pub decrease_value: Decimal,
    pub is_active: bool,
}

impl Default for OrderTypeInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_active_price_adjustment: false,
            price_increase: Decimal::ZERO,
            price_decrease: Decimal::ZERO,
            increase_type: String::new(),
            decrease_type: String::new(),
            increase_value: Decimal::ZERO,
            decrease_value: Decimal::ZERO,
            is_active: true,
        }
    }
}

const RETURNING: &str = "id, company_id, name, is_active_price_adjustment, price_increase, price_decrease, \
     increase_type, decrease_type, increase_value, decrease_value, is_active, created_at, updated_at";

impl TenantScoped for OrderType {
    const TABLE: &'static str = "order_types";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "company_id",
        "name",
        "is_active_price_adjustment",
        "price_increase",
        "price_decrease",
        "increase_type",
        "decrease_type",
        "increase_value",
        "decrease_value",
        "is_active",
        "created_at",
        "updated_at",
    ];
    const SORTABLE: &'static [&'static str] = &["name", "created_at", "updated_at"];
    const LABEL: &'static str = "Order type";
}

#[async_trait]
impl TenantWritable for OrderType {
    type Input = OrderTypeInput;

    fn validate(input: &OrderTypeInput) -> Result<(), ValidationError> {
        require_text("name", &input.name)?;
        let amounts = [
            ("price_increase", input.price_increase),
            ("price_decrease", input.price_decrease),
            ("increase_value", input.increase_value),
            ("decrease_value", input.decrease_value),
        ];
        for (field, value) in amounts {
            if value.is_sign_negative() {
                return Err(ValidationError::new(field, format!("{} must not be negative", field)));
            }
        }
        Ok(())
    }

    async fn insert(pool: &PgPool, company_id: Uuid, input: &OrderTypeInput) -> Result<Self, DatabaseError> {
        let sql = format!(
            "INSERT INTO order_types (company_id, name, is_active_price_adjustment, price_increase, \
             price_decrease, increase_type, decrease_type, increase_value, decrease_value, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, OrderType>(&sql)
            .bind(company_id)
            .bind(input.name.trim())
            .bind(input.is_active_price_adjustment)
            .bind(input.price_increase)
            .bind(input.price_decrease)
            .bind(input.increase_type.trim())
            .bind(input.decrease_type.trim())
            .bind(input.increase_value)
            .bind(input.decrease_value)
            .bind(input.is_active)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    async fn update(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        input: &OrderTypeInput,
    ) -> Result<Option<Self>, DatabaseError> {
        let sql = format!(
            "UPDATE order_types SET name = $1, is_active_price_adjustment = $2, price_increase = $3, \
             price_decrease = $4, increase_type = $5, decrease_type = $6, increase_value = $7, \
             decrease_value = $8, is_active = $9, updated_at = NOW() \
             WHERE id = $10 AND company_id = $11 RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, OrderType>(&sql)
            .bind(input.name.trim())
            .bind(input.is_active_price_adjustment)
            .bind(input.price_increase)
            .bind(input.price_decrease)
            .bind(input.increase_type.trim())
            .bind(input.decrease_type.trim())
            .bind(input.increase_value)
            .bind(input.decrease_value)
            .bind(input.is_active)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
