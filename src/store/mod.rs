//! Account persistence
//!
//! The login path only needs "find the account with this email in this
//! partition"; registration needs to create one. Both go through
//! `AccountStore` so the auth core can run against Postgres in production and
//! an in-memory map in tests.

mod memory;
mod postgres;

pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;

/// Stored accounts are split into end users and staff officers. Emails are
/// unique within a partition, not across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountPartition {
    Users,
    Officers,
}

impl AccountPartition {
    pub(crate) fn table(self) -> &'static str {
        match self {
            AccountPartition::Users => "users",
            AccountPartition::Officers => "officers",
        }
    }
}

/// The credential-bearing view of an account
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub aadhaar_number: String,
    pub pan_number: String,
}

#[derive(Debug, Clone)]
pub struct NewOfficer {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(
        &self,
        partition: AccountPartition,
        email: &str,
    ) -> Result<Option<Principal>, AppError>;

    /// # Errors
    /// `DatabaseError::UniqueConstraintViolation` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<i64, AppError>;

    /// # Errors
    /// `DatabaseError::UniqueConstraintViolation` when the email is taken.
    async fn create_officer(&self, officer: NewOfficer) -> Result<i64, AppError>;
}
