use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{CredentialError, CredentialService};
use crate::database::models::{NewCompany, NewUser, User, UserRole, ValidationError};
use crate::database::{AccountStore, DatabaseError};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "bussiness_name")]
    pub business_name: String,
    #[serde(default)]
    pub pos_pin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("username already taken")]
    DuplicateUsername,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for AccountError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation { ref constraint } if constraint.contains("email") => {
                AccountError::DuplicateEmail
            }
            DatabaseError::UniqueViolation { ref constraint } if constraint.contains("username") => {
                AccountError::DuplicateUsername
            }
            other => AccountError::Database(other),
        }
    }
}

/// Registration and login over an `AccountStore`.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    credentials: Arc<CredentialService>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, credentials: Arc<CredentialService>) -> Self {
        Self { store, credentials }
    }

    /// Creates a company and its first (admin) user as one unit.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AccountError> {
        let input = normalize(input);
        validate(&input)?;

        if self.store.find_user_by_email(&input.email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }
        if self.store.find_user_by_username(&input.username).await?.is_some() {
            return Err(AccountError::DuplicateUsername);
        }

        let password_hash = self.credentials.hash_password(&input.password).await?;

        // Dropping `scope` on any early return rolls both inserts back.
        let mut scope = self.store.begin().await?;
        let company = scope
            .create_company(&NewCompany { name: input.business_name.clone() })
            .await?;
        let user = scope
            .create_user(&NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                phone: input.phone,
                pos_pin: input.pos_pin,
                role: UserRole::Admin,
                company_id: company.id,
            })
            .await?;
        scope.commit().await?;

        info!("Registered company {} with admin user {}", company.id, user.id);
        Ok(user)
    }

    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AccountError> {
        let email = input.email.trim().to_lowercase();

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            self.credentials.verify_against_decoy(&input.password).await;
            warn!("Login failed: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !self.credentials.verify_password(&input.password, &user.password_hash).await {
            warn!("Login failed for user {}", user.id);
            return Err(AccountError::InvalidCredentials);
        }

        let issued = self.credentials.issue_token(&user)?;
        info!("User {} logged in", user.id);
        Ok(AuthSession { token: issued.token, expires_at: issued.expires_at, user })
    }
}

fn normalize(input: RegisterInput) -> RegisterInput {
    let trimmed = |value: Option<String>| {
        value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };
    RegisterInput {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        password: input.password,
        phone: trimmed(input.phone),
        business_name: input.business_name.trim().to_string(),
        pos_pin: trimmed(input.pos_pin),
    }
}

fn validate(input: &RegisterInput) -> Result<(), ValidationError> {
    if input.username.is_empty() {
        return Err(ValidationError::new("username", "username cannot be empty"));
    }
    if input.email.is_empty() {
        return Err(ValidationError::new("email", "email cannot be empty"));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if input.business_name.is_empty() {
        return Err(ValidationError::new("business_name", "business name cannot be empty"));
    }
    Ok(())
}
