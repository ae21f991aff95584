use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{non_blank, require_text, TenantScoped, TenantWritable, ValidationError};
use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Outlet {
    pub id: Uuid,
    pub company_id: Uuid,
    pub code: String,
    pub name: String,
    pub supervisor: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutletInput {
    pub code: String,
    pub name: String,
    pub supervisor: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

impl Default for OutletInput {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            supervisor: None,
            address: None,
            phone: None,
            email: None,
            is_active: true,
        }
    }
}

const RETURNING: &str =
    "id, company_id, code, name, supervisor, address, phone, email, is_active, created_at, updated_at";

impl TenantScoped for Outlet {
    const TABLE: &'static str = "outlets";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "company_id",
        "code",
        "name",
        "supervisor",
        "address",
        "phone",
        "email",
        "is_active",
        "created_at",
        "updated_at",
    ];
    const SORTABLE: &'static [&'static str] = &["code", "name", "created_at", "updated_at"];
    const LABEL: &'static str = "Outlet";
}

#[async_trait]
impl TenantWritable for Outlet {
    type Input = OutletInput;

    fn validate(input: &OutletInput) -> Result<(), ValidationError> {
        require_text("code", &input.code)?;
        require_text("name", &input.name)
    }

    async fn insert(pool: &PgPool, company_id: Uuid, input: &OutletInput) -> Result<Self, DatabaseError> {
        let sql = format!(
            "INSERT INTO outlets (company_id, code, name, supervisor, address, phone, email, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, Outlet>(&sql)
            .bind(company_id)
            .bind(input.code.trim())
            .bind(input.name.trim())
            .bind(non_blank(&input.supervisor))
            .bind(non_blank(&input.address))
            .bind(non_blank(&input.phone))
            .bind(non_blank(&input.email))
            .bind(input.is_active)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    async fn update(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        input: &OutletInput,
    ) -> Result<Option<Self>, DatabaseError> {
        let sql = format!(
            "UPDATE outlets SET code = $1, name = $2, supervisor = $3, address = $4, phone = $5, \
             email = $6, is_active = $7, updated_at = NOW() \
             WHERE id = $8 AND company_id = $9 RETURNING {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, Outlet>(&sql)
            .bind(input.code.trim())
            .bind(input.name.trim())
            .bind(non_blank(&input.supervisor))
            .bind(non_blank(&input.address))
            .bind(non_blank(&input.phone))
            .bind(non_blank(&input.email))
            .bind(input.is_active)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
