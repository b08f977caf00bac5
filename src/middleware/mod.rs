/// Middleware module
///
/// Per-request authentication and request logging.

mod authentication_gate;
mod request_logger;

pub use authentication_gate::{bearer_token, AuthenticationGate};
pub use request_logger::LoggerMiddleware;
