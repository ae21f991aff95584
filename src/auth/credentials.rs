#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use thiserror::Error;

use super::{Claims, Principal};
use crate::config::SecurityConfig;
use crate::database::models::User;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("Token lifetime must be positive")]
    InvalidTtl,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid or expired token")]
    InvalidToken,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Password hashing and HS256 token issue/verify.
pub struct CredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    bcrypt_cost: u32,
    /// Hash of a throwaway password at `bcrypt_cost`, checked when no user matches.
    decoy_hash: String,
    #[cfg(test)]
    verify_calls: AtomicUsize,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("ttl", &self.ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    pub fn new(secret: &str, ttl_hours: u64, bcrypt_cost: u32) -> Result<Self, CredentialError> {
        if secret.trim().is_empty() {
            return Err(CredentialError::EmptySecret);
        }
        let ttl_hours = i64::try_from(ttl_hours).map_err(|_| CredentialError::InvalidTtl)?;
        if ttl_hours <= 0 {
            return Err(CredentialError::InvalidTtl);
        }
        let ttl = Duration::try_hours(ttl_hours).ok_or(CredentialError::InvalidTtl)?;
        let decoy_hash =
            bcrypt::hash("pos-api-decoy-password", bcrypt_cost).map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            bcrypt_cost,
            decoy_hash,
            #[cfg(test)]
            verify_calls: AtomicUsize::new(0),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, CredentialError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours, security.bcrypt_cost)
    }

    /// bcrypt runs on the blocking pool so it never stalls the reactor.
    pub async fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| CredentialError::Hash(e.to_string()))?
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// False on mismatch and on a malformed stored hash.
    pub async fn verify_password(&self, password: &str, hash: &str) -> bool {
        #[cfg(test)]
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        let password = password.to_owned();
        let hash = hash.to_owned();
        match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(_)) | Err(_) => false,
        }
    }

    /// Spends the same bcrypt work as a real check when the account does not
    /// exist, so a miss answers no faster than a wrong password.
    pub async fn verify_against_decoy(&self, password: &str) {
        let _ = self.verify_password(password, &self.decoy_hash).await;
    }

    #[cfg(test)]
    pub(crate) fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn issue_token(&self, user: &User) -> Result<IssuedToken, CredentialError> {
        self.issue_token_at(user, Utc::now())
    }

    pub fn issue_token_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<IssuedToken, CredentialError> {
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: user.id,
            role: user.role,
            company_id: user.company_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::TokenGeneration(e.to_string()))?;

        // Report the second-truncated expiry actually written into the token.
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok(IssuedToken { token, expires_at })
    }

    /// Signature and expiry are checked with zero leeway; only HS256 is accepted.
    pub fn verify_token(&self, token: &str) -> Result<Principal, CredentialError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| Principal::from(data.claims))
            .map_err(|_| CredentialError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;
    use uuid::Uuid;

    fn service() -> CredentialService {
        CredentialService::new("unit-test-secret", 24, 4).unwrap()
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: String::new(),
            pos_pin: None,
            phone: None,
            company_id: Some(Uuid::new_v4()),
            role: UserRole::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(CredentialService::new("", 24, 10), Err(CredentialError::EmptySecret)));
        assert!(matches!(CredentialService::new("   ", 24, 10), Err(CredentialError::EmptySecret)));
        assert!(matches!(CredentialService::new("s", 0, 10), Err(CredentialError::InvalidTtl)));
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let svc = service();
        let hash = svc.hash_password("secret1").await.unwrap();
        assert_ne!(hash, "secret1");
        assert!(svc.verify_password("secret1", &hash).await);
        assert!(!svc.verify_password("secret2", &hash).await);
        assert!(!svc.verify_password("secret1", "not-a-bcrypt-hash").await);
    }

    #[tokio::test]
    async fn decoy_check_runs_bcrypt_at_configured_cost() {
        let svc = service();
        assert!(svc.decoy_hash.starts_with("$2"));
        assert!(svc.decoy_hash.contains("$04$"));

        let before = svc.verify_calls();
        svc.verify_against_decoy("pos-api-decoy-password").await;
        svc.verify_against_decoy("anything").await;
        assert_eq!(svc.verify_calls(), before + 2);
    }

    #[test]
    fn token_round_trips_principal() {
        let svc = service();
        let user = user();
        let issued = svc.issue_token(&user).unwrap();
        let principal = svc.verify_token(&issued.token).unwrap();
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.role, UserRole::Admin);
        assert_eq!(principal.company_id, user.company_id);
        assert!(issued.expires_at > Utc::now() + Duration::hours(23));
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let issued = svc.issue_token_at(&user(), Utc::now() - Duration::hours(25)).unwrap();
        assert!(matches!(svc.verify_token(&issued.token), Err(CredentialError::InvalidToken)));
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let svc = service();
        let issued = svc.issue_token(&user()).unwrap();

        let mut tampered = issued.token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(svc.verify_token(&tampered).is_err());

        let other = CredentialService::new("another-secret", 24, 4).unwrap();
        assert!(other.verify_token(&issued.token).is_err());
        assert!(svc.verify_token("not.a.token").is_err());
    }
}
