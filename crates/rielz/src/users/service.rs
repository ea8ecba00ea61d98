use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{Credentials, Registration, User, UserValidationError};
use super::repository::UserRepository;
use crate::auth::{hash_password, verify_password, PasswordError, TokenAuthority, TokenError};
use crate::storage::RepositoryError;
use crate::telemetry::spawn_blocking_with_tracing;

/// Registration and login on top of the user repository.
pub struct UserService<R> {
    repository: Arc<R>,
    tokens: Arc<TokenAuthority>,
}

impl<R> UserService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repository: Arc<R>, tokens: Arc<TokenAuthority>) -> Self {
        Self { repository, tokens }
    }

    pub async fn register(&self, mut registration: Registration) -> Result<User, UserServiceError> {
        registration.prepare();
        if !registration.email.is_empty()
            && self
                .repository
                .find_by_email(&registration.email)
                .await?
                .is_some()
        {
            return Err(UserServiceError::AlreadyRegistered);
        }
        registration.validate()?;

        let password = registration.password.clone();
        let password_hash =
            spawn_blocking_with_tracing(move || hash_password(&password)).await??;
        let user = self
            .repository
            .insert_user(registration.with_password_hash(password_hash))
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict => UserServiceError::AlreadyRegistered,
                other => UserServiceError::Repository(other),
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check the credentials and hand back a bearer token for the user.
    pub async fn login(&self, mut credentials: Credentials) -> Result<String, UserServiceError> {
        credentials.prepare();
        credentials.validate()?;

        let stored = self
            .repository
            .find_by_email(&credentials.email)
            .await?
            .ok_or(UserServiceError::UnknownAccount)?;

        let password = credentials.password;
        let password_hash = stored.password_hash.clone();
        let verified =
            spawn_blocking_with_tracing(move || verify_password(&password, &password_hash))
                .await??;
        if !verified {
            warn!(user_id = %stored.user.id, "login rejected: wrong password");
            return Err(UserServiceError::WrongPassword);
        }

        let token = self.tokens.issue(stored.user.id)?;
        info!(user_id = %stored.user.id, "user logged in");
        Ok(token)
    }
}

/// Error raised by the user service.
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error(transparent)]
    Validation(#[from] UserValidationError),
    #[error("User already registered, please login")]
    AlreadyRegistered,
    #[error("Login failed, please signup")]
    UnknownAccount,
    #[error("Login failed, please try again")]
    WrongPassword,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("password worker failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
