use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::domain::{Credentials, Registration, User};
use super::repository::UserRepository;
use super::service::{UserService, UserServiceError};
use crate::response::{ApiError, Envelope};

#[derive(Debug, Clone, Serialize)]
pub struct Registered {
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedIn {
    pub token: String,
}

/// Router builder exposing sign-up and login.
pub fn user_router<R>(service: Arc<UserService<R>>) -> Router
where
    R: UserRepository + 'static,
{
    Router::new()
        .route("/register", post(register_handler::<R>))
        .route("/login", post(login_handler::<R>))
        .with_state(service)
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<UserService<R>>>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Registered>>), ApiError>
where
    R: UserRepository + 'static,
{
    let Json(registration) = payload?;
    let user = service.register(registration).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success_with(
            "Registered successfully",
            Registered { user },
        )),
    ))
}

pub(crate) async fn login_handler<R>(
    State(service): State<Arc<UserService<R>>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Envelope<LoggedIn>>, ApiError>
where
    R: UserRepository + 'static,
{
    let Json(credentials) = payload?;
    let token = service.login(credentials).await?;
    Ok(Json(Envelope::success_with("logged in", LoggedIn { token })))
}

impl From<UserServiceError> for ApiError {
    fn from(value: UserServiceError) -> Self {
        match value {
            UserServiceError::Validation(err) => ApiError::Validation(err.to_string()),
            UserServiceError::AlreadyRegistered | UserServiceError::UnknownAccount => {
                ApiError::Rejected(value.to_string())
            }
            UserServiceError::WrongPassword => ApiError::Forbidden(value.to_string()),
            UserServiceError::Password(_)
            | UserServiceError::Token(_)
            | UserServiceError::Blocking(_) => ApiError::Internal(value.to_string()),
            UserServiceError::Repository(err) => ApiError::from(err),
        }
    }
}
