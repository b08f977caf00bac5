/// JWT Token Issuance and Validation
///
/// `TokenCodec` is built once from `JwtSettings` and shared read-only across
/// workers. Decoding checks signature, structure and issuer; expiry is judged
/// separately so callers can tell a forged token from a stale one.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::{Claims, Role};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_seconds: i64,
    issuer: String,
}

impl TokenCodec {
    pub fn new(config: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            lifetime_seconds: config.token_expiry,
            issuer: config.issuer.clone(),
        }
    }

    /// Issue a token for `subject` valid from now for the configured lifetime
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, AppError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issue a token with an explicit issued-at instant
    ///
    /// Identical inputs produce identical tokens (HS256 is deterministic).
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims::new(
            subject.to_string(),
            role,
            issued_at,
            self.lifetime_seconds,
            self.issuer.clone(),
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Decode and verify a token without judging its expiry
    ///
    /// # Errors
    /// `AuthError::TokenInvalid` if the signature does not verify, the token
    /// is malformed, the issuer differs, or a required claim is absent.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss"]);
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT decode failed");
                AuthError::TokenInvalid
            })
    }

    /// True when the token is past its expiry or cannot be decoded at all
    pub fn is_expired(&self, token: &str) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.is_expired(),
            Err(_) => true,
        }
    }

    /// Decode, then reject stale tokens
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.decode(token)?;
        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}
