//! Password hashing, session tokens and the middleware that guards protected routes.

mod middleware;
mod password;
mod token;

pub use middleware::auth_guard;
pub use password::{PasswordHash, RawPassword};
pub use token::{DEFAULT_TOKEN_LIFETIME, TokenKeys, decode_token, encode_token};
