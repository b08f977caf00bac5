//! Account kinds and the roles embedded in issued tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;
use crate::store::AccountPartition;

/// The caller-supplied login kind doubles as the role carried by the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Officer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Officer => "OFFICER",
            Role::Admin => "ADMIN",
        }
    }

    /// Which stored-account partition a login of this kind is checked against.
    ///
    /// Administrators have no partition of their own: any officer credential
    /// pair may request an ADMIN token.
    pub fn partition(self) -> AccountPartition {
        match self {
            Role::User => AccountPartition::Users,
            Role::Officer | Role::Admin => AccountPartition::Officers,
        }
    }

    pub fn is_staff(self) -> bool {
        matches!(self, Role::Officer | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "OFFICER" => Ok(Role::Officer),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(AuthError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("Officer".parse::<Role>().unwrap(), Role::Officer);
        assert_eq!(" ADMIN ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            "INVALID".parse::<Role>().unwrap_err(),
            AuthError::UnknownKind("INVALID".to_string())
        );
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_partitions() {
        assert_eq!(Role::User.partition(), AccountPartition::Users);
        assert_eq!(Role::Officer.partition(), AccountPartition::Officers);
        assert_eq!(Role::Admin.partition(), AccountPartition::Officers);
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Officer).unwrap(), "\"OFFICER\"");
        assert_eq!(serde_json::from_str::<Role>("\"ADMIN\"").unwrap(), Role::Admin);
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }
}
