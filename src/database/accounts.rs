use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::database::manager::DatabaseError;
use crate::database::models::{Company, NewCompany, NewUser, User};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, pos_pin, phone, company_id, role, created_at, updated_at";

/// Storage used by registration and login.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Opens a unit of work. Dropping the scope without `commit` discards
    /// everything written through it.
    async fn begin(&self) -> Result<Box<dyn AccountScope>, DatabaseError>;
}

/// Writes that succeed or fail together.
#[async_trait]
pub trait AccountScope: Send {
    async fn create_company(&mut self, company: &NewCompany) -> Result<Company, DatabaseError>;

    async fn create_user(&mut self, user: &NewUser) -> Result<User, DatabaseError>;

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        find_user_by_email(&self.pool, email).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        find_user_by_username(&self.pool, username).await
    }

    async fn begin(&self) -> Result<Box<dyn AccountScope>, DatabaseError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgAccountScope { tx }))
    }
}

/// A live transaction. sqlx rolls it back when dropped uncommitted.
pub struct PgAccountScope {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl AccountScope for PgAccountScope {
    async fn create_company(&mut self, company: &NewCompany) -> Result<Company, DatabaseError> {
        insert_company(&mut *self.tx, company).await
    }

    async fn create_user(&mut self, user: &NewUser) -> Result<User, DatabaseError> {
        insert_user(&mut *self.tx, user).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }
}

pub async fn find_user_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn find_user_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn insert_company<'e, E>(executor: E, company: &NewCompany) -> Result<Company, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, Company>(
        "INSERT INTO companies (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
    )
    .bind(&company.name)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

pub async fn insert_user<'e, E>(executor: E, user: &NewUser) -> Result<User, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO users (username, email, password_hash, pos_pin, phone, company_id, role) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        USER_COLUMNS
    );
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.pos_pin.as_deref())
        .bind(user.phone.as_deref())
        .bind(user.company_id)
        .bind(user.role.as_str())
        .fetch_one(executor)
        .await?;
    Ok(row)
}
