use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{AccountPartition, AccountStore, NewOfficer, NewUser, Principal};
use crate::error::{AppError, DatabaseError};

/// Process-local account store. Ids are assigned per partition starting at 1.
#[derive(Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<(AccountPartition, String), Principal>,
    next_ids: HashMap<AccountPartition, i64>,
}

impl Inner {
    fn insert(
        &mut self,
        partition: AccountPartition,
        email: String,
        password_hash: String,
    ) -> Result<i64, AppError> {
        let key = (partition, email.clone());
        if self.accounts.contains_key(&key) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Email already exists".to_string(),
            )));
        }

        let next = self.next_ids.entry(partition).or_insert(0);
        *next += 1;
        let id = *next;

        self.accounts.insert(
            key,
            Principal {
                id,
                email,
                password_hash,
            },
        );
        Ok(id)
    }
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(
        &self,
        partition: AccountPartition,
        email: &str,
    ) -> Result<Option<Principal>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(&(partition, email.to_string())).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<i64, AppError> {
        let mut inner = self.inner.write().await;
        inner.insert(AccountPartition::Users, user.email, user.password_hash)
    }

    async fn create_officer(&self, officer: NewOfficer) -> Result<i64, AppError> {
        let mut inner = self.inner.write().await;
        inner.insert(AccountPartition::Officers, officer.email, officer.password_hash)
    }
}
