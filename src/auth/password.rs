/// Credential hashing and comparison (bcrypt)

use bcrypt::{hash, verify, DEFAULT_COST};
use lazy_static::lazy_static;

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
// bcrypt ignores input past 72 bytes; anything longer is refused outright.
const MAX_PASSWORD_LENGTH: usize = 128;

lazy_static! {
    // Same cost as account hashes. No account uses this secret.
    static ref DUMMY_HASH: String =
        hash("no-account-has-this-secret", DEFAULT_COST).unwrap_or_default();
}

/// Hash a new account secret after checking it meets the strength policy
pub fn hash_password(password: &str) -> Result<String, AppError> {
    check_password_policy(password)?;

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Compare a presented secret with a stored bcrypt hash
///
/// # Errors
/// Returns error only when the stored hash itself is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    verify(password, stored_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

/// Login-side comparison: a corrupt stored hash counts as a mismatch.
pub fn matches(password: &str, stored_hash: &str) -> bool {
    match verify_password(password, stored_hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Stored credential could not be compared");
            false
        }
    }
}

/// Spends one bcrypt comparison for a login whose account does not exist,
/// so a miss costs the same as a wrong password.
pub fn verify_without_account(password: &str) {
    let _ = verify(password, &DUMMY_HASH);
}

/// 8-128 characters with at least one digit, one lowercase and one uppercase letter
fn check_password_policy(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort("password".to_string(), MIN_PASSWORD_LENGTH));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_LENGTH));
    }

    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lowercase = password.chars().any(char::is_lowercase);
    let has_uppercase = password.chars().any(char::is_uppercase);

    if !(has_digit && has_lowercase && has_uppercase) {
        return Err(ValidationError::Rejected(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_bcrypt() {
        let password = "TestPassword123!";
        let first = hash_password(password).expect("Failed to hash password");
        let second = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, first);
        assert!(first.starts_with("$2"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_matches_registered_secret() {
        let hash = hash_password("TestPassword123!").unwrap();
        assert!(matches("TestPassword123!", &hash));
    }

    #[test]
    fn test_rejects_other_secrets() {
        let hash = hash_password("TestPassword123!").unwrap();

        for wrong in ["TestPassword123", "testpassword123!", "", "TestPassword123!!"] {
            assert!(!matches(wrong, &hash), "accepted {:?}", wrong);
        }
    }

    #[test]
    fn test_corrupt_hash_is_a_mismatch() {
        assert!(verify_password("TestPassword123!", "not-a-bcrypt-hash").is_err());
        assert!(!matches("TestPassword123!", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_dummy_hash_costs_like_an_account_hash() {
        let account_hash = hash_password("TestPassword123!").unwrap();

        assert!(DUMMY_HASH.starts_with("$2"));
        assert_eq!(&DUMMY_HASH[..7], &account_hash[..7]);
        assert_eq!(verify_password("TestPassword123!", &DUMMY_HASH).unwrap(), false);
    }

    #[test]
    fn test_policy() {
        assert!(check_password_policy("ValidPassword123").is_ok());
        assert!(check_password_policy("Short1").is_err());
        assert!(check_password_policy(&("a".repeat(MAX_PASSWORD_LENGTH) + "A1")).is_err());
        assert!(check_password_policy("NoDigitsPassword").is_err());
        assert!(check_password_policy("NOLOWERCASE1").is_err());
        assert!(check_password_policy("nouppercase1").is_err());
    }
}
