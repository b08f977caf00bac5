/// Authentication module
///
/// Token issuance/validation, credential hashing, login dispatch and the
/// per-request identity that downstream handlers authorize against.

mod claims;
mod context;
mod jwt;
mod login;
mod password;
mod role;

pub use claims::Claims;
pub use context::{AuthContext, AuthenticatedUser};
pub use jwt::TokenCodec;
pub use login::{LoginDispatcher, Session};
pub use password::{hash_password, matches, verify_password};
pub use role::Role;
