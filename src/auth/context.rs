/// Per-request identity
///
/// The authentication gate attaches an `AuthContext` to request extensions
/// when (and only when) the bearer token is valid. Handlers that need an
/// identity take `AuthenticatedUser`, which turns a missing context into 401.

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use sqlx::PgPool;
use std::future::{ready, Ready};

use crate::auth::{Claims, Role};
use crate::error::{AppError, AuthError};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub subject: String,
    pub role: Role,
    pub token: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims, token: String) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
            token,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub AuthContext);

impl AuthenticatedUser {
    pub fn subject(&self) -> &str {
        &self.0.subject
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// OFFICER or ADMIN
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role().is_staff() {
            Ok(())
        } else {
            Err(AuthError::Forbidden.into())
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role() == Role::Admin {
            Ok(())
        } else {
            Err(AuthError::Forbidden.into())
        }
    }

    /// True when a USER token belongs to the account with `email`
    pub fn owns(&self, email: &str) -> bool {
        self.role() == Role::User && self.subject().eq_ignore_ascii_case(email)
    }

    /// Staff may act on any user; a USER only on their own account.
    pub async fn require_owner_or_staff(&self, pool: &PgPool, user_id: i64) -> Result<(), AppError> {
        if self.role().is_staff() {
            return Ok(());
        }

        let email = sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        match email {
            Some(email) if self.owns(&email) => Ok(()),
            _ => {
                tracing::warn!(subject = %self.subject(), user_id, "Access to another user's data denied");
                Err(AuthError::Forbidden.into())
            }
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let context = req.extensions().get::<AuthContext>().cloned();
        ready(
            context
                .map(AuthenticatedUser)
                .ok_or(AppError::Auth(AuthError::MissingToken)),
        )
    }
}
