pub mod credentials;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::UserRole;
use crate::error::ApiError;

pub use credentials::{CredentialError, CredentialService, IssuedToken};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated identity taken from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            company_id: claims.company_id,
        }
    }
}

impl Principal {
    /// The tenant every scoped query must filter by.
    pub fn company_id(&self) -> Result<Uuid, ApiError> {
        self.company_id
            .ok_or_else(|| ApiError::unauthorized("company info missing"))
    }
}
