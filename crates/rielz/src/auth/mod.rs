//! Bearer-token authentication and password hashing.

mod extractor;
pub mod password;
pub mod token;

pub use extractor::AuthenticatedUser;
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{TokenAuthority, TokenError};
