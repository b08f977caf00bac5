use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountPartition, AccountStore, NewOfficer, NewUser, Principal};
use crate::error::AppError;

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
    async fn find_by_email(
        &self,
        partition: AccountPartition,
        email: &str,
    ) -> Result<Option<Principal>, AppError> {
        // Table name comes from a closed enum, never from input.
        let query = format!(
            "SELECT id, email, password_hash FROM {} WHERE email = $1",
            partition.table()
        );

        let row = sqlx::query_as::<_, (i64, String, String)>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, email, password_hash)| Principal {
            id,
            email,
            password_hash,
        }))
    }

    async fn create_user(&self, user: NewUser) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email, password_hash, address, date_of_birth, aadhaar_number, pan_number, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'USER')
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(user.date_of_birth)
        .bind(&user.aadhaar_number)
        .bind(&user.pan_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn create_officer(&self, officer: NewOfficer) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO officers (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&officer.name)
        .bind(&officer.email)
        .bind(&officer.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
