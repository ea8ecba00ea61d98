use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::domain::{Tenant, TenantSubmission};
use super::repository::TenantRepository;
use super::service::{TenantService, TenantServiceError};
use crate::auth::AuthenticatedUser;
use crate::houses::HouseRepository;
use crate::response::{ApiError, Envelope};

#[derive(Debug, Clone, Serialize)]
pub struct TenantAdded {
    pub tenant: Tenant,
}

/// Router builder exposing tenant admission.
pub fn tenant_router<S>(service: Arc<TenantService<S>>) -> Router
where
    S: HouseRepository + TenantRepository + 'static,
{
    Router::new()
        .route("/api/houses/tenant", post(admit_handler::<S>))
        .with_state(service)
}

pub(crate) async fn admit_handler<S>(
    State(service): State<Arc<TenantService<S>>>,
    AuthenticatedUser(caller): AuthenticatedUser,
    payload: Result<Json<TenantSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<TenantAdded>>), ApiError>
where
    S: HouseRepository + TenantRepository + 'static,
{
    let Json(submission) = payload?;
    let tenant = service.admit(caller, submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success_with(
            "Tenant added successfully",
            TenantAdded { tenant },
        )),
    ))
}

impl From<TenantServiceError> for ApiError {
    fn from(value: TenantServiceError) -> Self {
        match value {
            TenantServiceError::Validation(err) => ApiError::Validation(err.to_string()),
            TenantServiceError::House(err) => ApiError::from(err),
            TenantServiceError::NoAvailableRooms => ApiError::Conflict(value.to_string()),
            TenantServiceError::Repository(err) => ApiError::from(err),
        }
    }
}
