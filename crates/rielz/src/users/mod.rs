//! Landlord accounts: sign-up and login issuing bearer tokens.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Credentials, NewUser, Registration, StoredUser, User, UserValidationError};
pub use repository::UserRepository;
pub use router::{user_router, LoggedIn, Registered};
pub use service::{UserService, UserServiceError};
