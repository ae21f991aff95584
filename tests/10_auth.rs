mod common;

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use pos_api::auth::{Claims, CredentialService};
use pos_api::database::accounts::insert_user;
use pos_api::database::models::{NewCompany, NewUser, User, UserRole};
use pos_api::database::{AccountScope, AccountStore, DatabaseError, PgAccountStore};
use pos_api::services::{AccountError, AccountService, LoginInput, RegisterInput};
use uuid::Uuid;

const SECRET: &str = "integration-test-secret";

fn credentials() -> CredentialService {
    CredentialService::new(SECRET, 24, 4).expect("valid credential settings")
}

fn sample_user() -> User {
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

#[tokio::test]
async fn password_hash_verifies_only_the_original() -> Result<()> {
    let svc = credentials();
    for password in ["secret1", "correct horse battery staple", "pässwörd"] {
        let hash = svc.hash_password(password).await?;
        assert!(svc.verify_password(password, &hash).await);
        assert!(!svc.verify_password(&format!("{}x", password), &hash).await);
    }
    Ok(())
}

#[test]
fn token_valid_until_expiry() -> Result<()> {
    let svc = credentials();
    let user = sample_user();

    let fresh = svc.issue_token_at(&user, Utc::now() - Duration::hours(23))?;
    assert_eq!(svc.verify_token(&fresh.token)?.user_id, user.id);

    let stale = svc.issue_token_at(&user, Utc::now() - Duration::hours(24) - Duration::seconds(5))?;
    assert!(svc.verify_token(&stale.token).is_err());
    Ok(())
}

#[test]
fn altered_payload_is_rejected() -> Result<()> {
    let svc = credentials();
    let issued = svc.issue_token(&sample_user())?;

    let parts: Vec<&str> = issued.token.split('.').collect();
    assert_eq!(parts.len(), 3);
    let other = svc.issue_token(&User { role: UserRole::Waiter, ..sample_user() })?;
    let other_payload = other.token.split('.').nth(1).unwrap_or_default();

    let spliced = format!("{}.{}.{}", parts[0], other_payload, parts[2]);
    assert!(svc.verify_token(&spliced).is_err());
    Ok(())
}

#[test]
fn other_algorithms_are_rejected_even_with_the_right_secret() -> Result<()> {
    let svc = credentials();
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4(),
        role: UserRole::Admin,
        company_id: Some(Uuid::new_v4()),
        iat: now,
        exp: now + 3600,
    };
    let token = encode(&Header::new(Algorithm::HS512), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))?;
    assert!(svc.verify_token(&token).is_err());
    Ok(())
}

fn account_service(pool: sqlx::PgPool) -> AccountService {
    AccountService::new(Arc::new(PgAccountStore::new(pool)), Arc::new(credentials()))
}

fn registration(username: &str, email: &str) -> RegisterInput {
    RegisterInput {
        username: username.to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
        phone: None,
        business_name: common::unique("Alice Co"),
        pos_pin: None,
    }
}

#[tokio::test]
async fn register_then_login_against_postgres() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let svc = account_service(pool.clone());

    let username = common::unique("alice");
    let email = format!("{}@x.com", username);
    let user = svc.register(registration(&username, &email)).await?;
    assert_eq!(user.role, UserRole::Admin);
    let company_id = user.company_id.expect("admin belongs to a company");
    assert_eq!(common::count_where(&pool, "companies", "id::text", &company_id.to_string()).await?, 1);

    let session = svc
        .login(LoginInput { email: email.to_uppercase(), password: "secret1".to_string() })
        .await?;
    let principal = credentials().verify_token(&session.token)?;
    assert_eq!(principal.user_id, user.id);
    assert_eq!(principal.company_id, Some(company_id));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_changes_nothing() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let svc = account_service(pool.clone());

    let username = common::unique("alice");
    let email = format!("{}@x.com", username);
    svc.register(registration(&username, &email)).await?;

    let second = registration(&common::unique("bob"), &email);
    let business = second.business_name.clone();
    let err = svc.register(second).await.unwrap_err();
    assert!(matches!(err, AccountError::DuplicateEmail), "got {:?}", err);

    assert_eq!(common::count_where(&pool, "users", "email", &email).await?, 1);
    assert_eq!(common::count_where(&pool, "companies", "name", &business).await?, 0);
    Ok(())
}

#[tokio::test]
async fn unique_constraint_backs_the_duplicate_check() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let company_id = common::seed_company(&pool).await?;

    let new_user = |email: String| NewUser {
        username: "shared_name_for_constraint_test".to_string(),
        email,
        password_hash: "x".to_string(),
        phone: None,
        pos_pin: None,
        role: UserRole::Cashier,
        company_id,
    };

    // The first insert may collide with an earlier run; either way the second must.
    let _ = insert_user(&pool, &new_user(format!("{}@x.com", common::unique("c")))).await;
    let err = insert_user(&pool, &new_user(format!("{}@x.com", common::unique("c"))))
        .await
        .unwrap_err();
    match err {
        DatabaseError::UniqueViolation { constraint } => assert_eq!(constraint, "users_username_key"),
        other => panic!("expected unique violation, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn dropped_scope_rolls_back_company() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let store = PgAccountStore::new(pool.clone());
    let name = common::unique("Ghost Co");

    {
        let mut scope = store.begin().await?;
        scope
            .create_company(&NewCompany { name: name.clone() })
            .await?;
        // No commit.
    }

    assert_eq!(common::count_where(&pool, "companies", "name", &name).await?, 0);
    Ok(())
}
