/// JWT Claims structure
///
/// The payload of an issued token: who (`sub`), as what (`role`), and the
/// window during which the token is honoured.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (account email)
    pub sub: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(
        subject: String,
        role: Role,
        issued_at: DateTime<Utc>,
        lifetime_seconds: i64,
        issuer: String,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject,
            role,
            iat,
            exp: iat + lifetime_seconds,
            iss: issuer,
        }
    }

    /// A token is honoured only while `now < exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let now = Utc::now();
        let claims = Claims::new(
            "test@example.com".to_string(),
            Role::User,
            now,
            3600,
            "test".to_string(),
        );

        assert_eq!(claims.sub, "test@example.com");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let issued = Utc::now();
        let claims = Claims::new("a@b.com".to_string(), Role::Officer, issued, 60, "t".to_string());

        assert!(!claims.is_expired_at(issued + Duration::seconds(59)));
        assert!(claims.is_expired_at(issued + Duration::seconds(60)));
    }

    #[test]
    fn test_backdated_claims_are_expired() {
        let claims = Claims::new(
            "a@b.com".to_string(),
            Role::User,
            Utc::now() - Duration::hours(48),
            86_400,
            "t".to_string(),
        );
        assert!(claims.is_expired());
    }
}
