/// Login dispatch
///
/// Resolves the requested kind to an account partition, checks the presented
/// secret and issues exactly one token on success.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::{password, Role, TokenCodec};
use crate::error::{AppError, AuthError};
use crate::store::AccountStore;

/// What a successful login hands back to the client
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct LoginDispatcher {
    accounts: Arc<dyn AccountStore>,
    codec: TokenCodec,
}

impl LoginDispatcher {
    pub fn new(accounts: Arc<dyn AccountStore>, codec: TokenCodec) -> Self {
        Self { accounts, codec }
    }

    /// # Errors
    /// - `AuthError::AccountNotFound` / `AuthError::CredentialMismatch`, which
    ///   render identically to the client
    /// - database errors from the account store, passed through unchanged
    pub async fn login(&self, email: &str, password: &str, kind: Role) -> Result<Session, AppError> {
        let email = email.trim().to_lowercase();

        let principal = match self.accounts.find_by_email(kind.partition(), &email).await? {
            Some(principal) => principal,
            None => {
                password::verify_without_account(password);
                return Err(AuthError::AccountNotFound.into());
            }
        };

        if !password::matches(password, &principal.password_hash) {
            return Err(AuthError::CredentialMismatch.into());
        }

        let token = self.codec.issue(&principal.email, kind)?;

        tracing::info!(account_id = principal.id, role = %kind, "Login succeeded");

        Ok(Session {
            token,
            username: principal.email,
            role: kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::configuration::JwtSettings;
    use crate::store::{InMemoryAccountStore, NewOfficer, NewUser};
    use chrono::NaiveDate;

    fn codec() -> TokenCodec {
        TokenCodec::new(&JwtSettings {
            secret: "login-dispatcher-test-secret-0123456789".to_string(),
            token_expiry: 86_400,
            issuer: "test".to_string(),
        })
    }

    async fn dispatcher() -> LoginDispatcher {
        let store = InMemoryAccountStore::new();
        store
            .create_user(NewUser {
                name: "John Doe".to_string(),
                email: "john.doe@example.com".to_string(),
                password_hash: hash_password("TestPassword123!").unwrap(),
                address: "123 Main Street, Mumbai".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
                aadhaar_number: "123456789012".to_string(),
                pan_number: "ABCDE1234F".to_string(),
            })
            .await
            .unwrap();
        store
            .create_officer(NewOfficer {
                name: "Michael Johnson".to_string(),
                email: "officer1@insurance.com".to_string(),
                password_hash: hash_password("OfficerSecure789!").unwrap(),
            })
            .await
            .unwrap();

        LoginDispatcher::new(Arc::new(store), codec())
    }

    #[tokio::test]
    async fn test_user_login_issues_user_token() {
        let dispatcher = dispatcher().await;

        let session = dispatcher
            .login("john.doe@example.com", "TestPassword123!", Role::User)
            .await
            .expect("login should succeed");

        assert_eq!(session.username, "john.doe@example.com");
        assert_eq!(session.role, Role::User);

        let claims = codec().decode(&session.token).unwrap();
        assert_eq!(claims.sub, "john.doe@example.com");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn test_email_is_matched_case_insensitively() {
        let dispatcher = dispatcher().await;
        assert!(dispatcher
            .login("  John.Doe@Example.com", "TestPassword123!", Role::User)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_user_credentials_rejected_as_officer() {
        let dispatcher = dispatcher().await;

        let err = dispatcher
            .login("john.doe@example.com", "TestPassword123!", Role::Officer)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(AuthError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let dispatcher = dispatcher().await;

        let err = dispatcher
            .login("john.doe@example.com", "WrongPassword1", Role::User)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(AuthError::CredentialMismatch)));
    }

    #[tokio::test]
    async fn test_unknown_account_costs_a_password_check() {
        let dispatcher = dispatcher().await;
        // First use builds the dummy hash; keep that out of the timing.
        let _ = dispatcher.login("warm@example.com", "P1", Role::User).await;

        let started = std::time::Instant::now();
        let _ = dispatcher
            .login("john.doe@example.com", "WrongPassword1", Role::User)
            .await;
        let mismatch = started.elapsed();

        let started = std::time::Instant::now();
        let _ = dispatcher
            .login("nobody@example.com", "WrongPassword1", Role::User)
            .await;
        let miss = started.elapsed();

        assert!(
            miss * 4 >= mismatch,
            "miss took {:?}, mismatch took {:?}",
            miss,
            mismatch
        );
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let dispatcher = dispatcher().await;

        let err = dispatcher.login("a@b.com", "P1", Role::User).await.unwrap_err();

        assert!(matches!(err, AppError::Auth(AuthError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_officer_credentials_may_request_admin_role() {
        let dispatcher = dispatcher().await;

        let officer = dispatcher
            .login("officer1@insurance.com", "OfficerSecure789!", Role::Officer)
            .await
            .unwrap();
        let admin = dispatcher
            .login("officer1@insurance.com", "OfficerSecure789!", Role::Admin)
            .await
            .unwrap();

        assert_eq!(officer.role, Role::Officer);
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(codec().decode(&admin.token).unwrap().role, Role::Admin);
    }
}
