/// Input validators for registration and proposal payloads
///
/// Length limits bound the work done on hostile input; formats follow the
/// identity documents the insurer collects (Aadhaar, PAN) and vehicle plates.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_NAME_LENGTH: usize = 256;
const MAX_ADDRESS_LENGTH: usize = 512;
const MAX_REASON_LENGTH: usize = 1000;

lazy_static! {
    // RFC 5322 simplified
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    static ref AADHAAR_REGEX: Regex = Regex::new(r"^[0-9]{12}$").unwrap();

    static ref PAN_REGEX: Regex = Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap();

    static ref VEHICLE_NUMBER_REGEX: Regex = Regex::new(r"^[A-Z0-9]{4,15}$").unwrap();

    // Keywords only count in SQL position (followed by `(`, `SELECT`, ...),
    // so surnames like Castillo or Lancaster pass.
    static ref SQL_INJECTION_PATTERNS: [Regex; 6] = [
        // Union-based
        Regex::new(r"(?i)\bUNION\s+(ALL\s+)?SELECT\b").unwrap(),
        // Comment-based
        Regex::new(r"(?i)(--|;|/\*|\*/|\bxp_cmdshell\b)").unwrap(),
        // Stacked queries
        Regex::new(r"(?i);\s*(INSERT|UPDATE|DELETE|DROP|CREATE|ALTER)\b").unwrap(),
        // Time-based blind
        Regex::new(r"(?i)(\b(SLEEP|BENCHMARK)\s*\(|\bWAITFOR\s+DELAY\b|\bDBMS_LOCK\.)").unwrap(),
        // Boolean-based
        Regex::new(r#"(?i)(\bOR\b|\bAND\b)\s*(['"][0-9]*['"]|[0-9]*)\s*=\s*(['"][0-9]*['"]|[0-9]*|True|False)"#).unwrap(),
        // Function-based
        Regex::new(r"(?i)\b(CAST|CONVERT|SUBSTRING|CONCAT|LOAD_FILE)\s*\(").unwrap(),
    ];
}

fn field(name: &str) -> String {
    name.to_string()
}

/// Validates an account email and returns it trimmed and lower-cased
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field("email")));
    }
    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort(field("email"), MIN_EMAIL_LENGTH));
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong(field("email"), MAX_EMAIL_LENGTH));
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat(field("email")));
    }
    if has_suspicious_email_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent(field("email")));
    }
    if contains_sql_injection_patterns(trimmed) {
        return Err(ValidationError::PossibleSQLInjection);
    }

    Ok(trimmed.to_lowercase())
}

/// Validates a person's display name
pub fn is_valid_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field("name")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field("name"), MAX_NAME_LENGTH));
    }
    if has_suspicious_text_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent(field("name")));
    }
    if contains_sql_injection_patterns(trimmed) {
        return Err(ValidationError::PossibleSQLInjection);
    }

    Ok(trimmed.to_string())
}

/// Postal addresses allow commas and digits but not control characters
pub fn is_valid_address(address: &str) -> Result<String, ValidationError> {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field("address")));
    }
    if trimmed.len() > MAX_ADDRESS_LENGTH {
        return Err(ValidationError::TooLong(field("address"), MAX_ADDRESS_LENGTH));
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::SuspiciousContent(field("address")));
    }

    Ok(trimmed.to_string())
}

/// Aadhaar numbers are exactly 12 digits; spaces between groups are tolerated
pub fn is_valid_aadhaar(aadhaar: &str) -> Result<String, ValidationError> {
    let compact: String = aadhaar.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Err(ValidationError::EmptyField(field("aadhaarNumber")));
    }
    if !AADHAAR_REGEX.is_match(&compact) {
        return Err(ValidationError::InvalidFormat(field("aadhaarNumber")));
    }

    Ok(compact)
}

/// PAN: five letters, four digits, one letter (e.g. ABCDE1234F)
pub fn is_valid_pan(pan: &str) -> Result<String, ValidationError> {
    let upper = pan.trim().to_uppercase();

    if upper.is_empty() {
        return Err(ValidationError::EmptyField(field("panNumber")));
    }
    if !PAN_REGEX.is_match(&upper) {
        return Err(ValidationError::InvalidFormat(field("panNumber")));
    }

    Ok(upper)
}

/// Registration plates, normalised to upper case without separators
pub fn is_valid_vehicle_number(number: &str) -> Result<String, ValidationError> {
    let normalised: String = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();

    if normalised.is_empty() {
        return Err(ValidationError::EmptyField(field("vehicleNumber")));
    }
    if !VEHICLE_NUMBER_REGEX.is_match(&normalised) {
        return Err(ValidationError::InvalidFormat(field("vehicleNumber")));
    }

    Ok(normalised)
}

/// Date of birth must lie strictly before `today`
pub fn is_valid_date_of_birth(dob: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if dob >= today {
        return Err(ValidationError::InvalidFormat(field("dateOfBirth")));
    }
    Ok(dob)
}

/// Free-text claim reason
pub fn is_valid_reason(reason: &str) -> Result<String, ValidationError> {
    let trimmed = reason.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field("reason")));
    }
    if trimmed.len() > MAX_REASON_LENGTH {
        return Err(ValidationError::TooLong(field("reason"), MAX_REASON_LENGTH));
    }
    if trimmed.contains('\0') {
        return Err(ValidationError::SuspiciousContent(field("reason")));
    }

    Ok(trimmed.to_string())
}

fn has_suspicious_email_patterns(email: &str) -> bool {
    if let Some(at_pos) = email.find('@') {
        if email[..at_pos].len() > 64 {
            return true;
        }
    }

    email.matches('@').count() != 1 || email.contains('\0')
}

fn has_suspicious_text_patterns(text: &str) -> bool {
    if text.chars().any(|c| c.is_control()) {
        return true;
    }

    let special_char_count = text
        .chars()
        .filter(|c| {
            !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '-' | '.' | '_' | '\'')
        })
        .count();

    special_char_count > 5
}

fn contains_sql_injection_patterns(input: &str) -> bool {
    SQL_INJECTION_PATTERNS.iter().any(|pattern| pattern.is_match(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_is_normalised() {
        assert_eq!(
            is_valid_email("  John.Doe@Example.com ").unwrap(),
            "john.doe@example.com"
        );
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());
        assert!(is_valid_email("a@b").is_err());
    }

    #[test]
    fn test_sql_injection_in_email() {
        assert!(is_valid_email("user' OR '1'='1@example.com").is_err());
        assert!(is_valid_email("user; DROP TABLE@example.com").is_err());
    }

    #[test]
    fn test_sql_keywords_inside_words_are_not_flagged() {
        for name in ["Maria Castillo", "Fidel Castro", "Burt Lancaster", "Union Station Cafe"] {
            assert_eq!(is_valid_name(name), Ok(name.to_string()));
        }
        for email in [
            "broadcast@example.com",
            "newscaster@example.com",
            "concat.dev@example.com",
            "sleepy.hollow@example.com",
        ] {
            assert_eq!(is_valid_email(email), Ok(email.to_string()));
        }
    }

    #[test]
    fn test_sql_syntax_is_flagged() {
        assert_eq!(
            is_valid_name("CAST(1 AS INT)"),
            Err(ValidationError::PossibleSQLInjection)
        );
        assert_eq!(
            is_valid_name("x UNION SELECT password"),
            Err(ValidationError::PossibleSQLInjection)
        );
        assert!(contains_sql_injection_patterns("1; WAITFOR DELAY '0:0:5'"));
        assert!(contains_sql_injection_patterns("sleep(5)"));
    }

    #[test]
    fn test_valid_name() {
        assert!(is_valid_name("John Doe").is_ok());
        assert!(is_valid_name("Jean-Pierre").is_ok());
        assert!(is_valid_name("O'Brien").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(is_valid_name("").is_err());
        assert!(is_valid_name(&"a".repeat(257)).is_err());
        assert!(is_valid_name("Name\0with\0null").is_err());
        assert!(is_valid_name("!!!!!!@@@@").is_err());
        assert!(is_valid_name("John'; DROP TABLE users--").is_err());
    }

    #[test]
    fn test_address_allows_punctuation() {
        assert!(is_valid_address("123 Main Street, Mumbai, Maharashtra 400001").is_ok());
        assert!(is_valid_address("   ").is_err());
        assert!(is_valid_address("line\u{7}bell").is_err());
    }

    #[test]
    fn test_aadhaar() {
        assert_eq!(is_valid_aadhaar("1234 5678 9012").unwrap(), "123456789012");
        assert!(is_valid_aadhaar("12345678901").is_err());
        assert!(is_valid_aadhaar("12345678901a").is_err());
    }

    #[test]
    fn test_pan() {
        assert_eq!(is_valid_pan("abcde1234f").unwrap(), "ABCDE1234F");
        assert!(is_valid_pan("ABCD1234FF").is_err());
        assert!(is_valid_pan("").is_err());
    }

    #[test]
    fn test_vehicle_number() {
        assert_eq!(is_valid_vehicle_number("ka-01 ab 1234").unwrap(), "KA01AB1234");
        assert!(is_valid_vehicle_number("AB1").is_err());
        assert!(is_valid_vehicle_number("KA01$1234").is_err());
    }

    #[test]
    fn test_date_of_birth_must_be_in_the_past() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let past = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();

        assert!(is_valid_date_of_birth(past, today).is_ok());
        assert!(is_valid_date_of_birth(today, today).is_err());
    }

    #[test]
    fn test_reason() {
        assert_eq!(is_valid_reason("  Vehicle damaged in accident ").unwrap(), "Vehicle damaged in accident");
        assert!(is_valid_reason("").is_err());
        assert!(is_valid_reason(&"x".repeat(1001)).is_err());
    }
}
