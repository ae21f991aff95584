use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{Company, NewCompany, NewUser, User};
use crate::database::{AccountScope, AccountStore, DatabaseError};

/// In-memory `AccountStore` whose scopes stage writes until commit.
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    companies: Vec<Company>,
    users: Vec<User>,
    fault: Option<Fault>,
}

#[derive(Clone)]
enum Fault {
    Fail,
    Violate(&'static str),
}

impl MemoryAccountStore {
    pub fn company_count(&self) -> usize {
        self.lock().companies.len()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// The next `create_user` in any scope fails with a query error.
    pub fn fail_next_user_insert(&self) {
        self.lock().fault = Some(Fault::Fail);
    }

    /// The next `create_user` reports a unique violation on `constraint`.
    pub fn violate_next_user_insert(&self, constraint: &'static str) {
        self.lock().fault = Some(Fault::Violate(constraint));
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.lock().users.iter().find(|u| u.username == username).cloned())
    }

    async fn begin(&self) -> Result<Box<dyn AccountScope>, DatabaseError> {
        Ok(Box::new(MemoryScope {
            store: self.clone(),
            companies: Vec::new(),
            users: Vec::new(),
        }))
    }
}

struct MemoryScope {
    store: MemoryAccountStore,
    companies: Vec<Company>,
    users: Vec<User>,
}

fn unique_violation(constraint: &str) -> DatabaseError {
    DatabaseError::UniqueViolation { constraint: constraint.to_string() }
}

#[async_trait]
impl AccountScope for MemoryScope {
    async fn create_company(&mut self, company: &NewCompany) -> Result<Company, DatabaseError> {
        let now = Utc::now();
        let row = Company {
            id: Uuid::new_v4(),
            name: company.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.companies.push(row.clone());
        Ok(row)
    }

    async fn create_user(&mut self, user: &NewUser) -> Result<User, DatabaseError> {
        let mut guard = self.store.lock();
        let state = &mut *guard;
        match state.fault.take() {
            Some(Fault::Fail) => return Err(DatabaseError::QueryError("injected failure".to_string())),
            Some(Fault::Violate(constraint)) => return Err(unique_violation(constraint)),
            None => {}
        }

        let existing = state.users.iter().chain(self.users.iter());
        for other in existing {
            if other.email == user.email {
                return Err(unique_violation("users_email_key"));
            }
            if other.username == user.username {
                return Err(unique_violation("users_username_key"));
            }
        }

        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            pos_pin: user.pos_pin.clone(),
            phone: user.phone.clone(),
            company_id: Some(user.company_id),
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.users.push(row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let MemoryScope { store, companies, users } = *self;
        let mut state = store.lock();
        state.companies.extend(companies);
        state.users.extend(users);
        Ok(())
    }
}
