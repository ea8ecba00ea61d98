use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::domain::{House, HouseFilter, HouseSubmission, HouseUpdate};
use super::repository::HouseRepository;
use super::service::{HouseAction, HouseService, HouseServiceError};
use crate::auth::AuthenticatedUser;
use crate::ids::{HouseId, UserId};
use crate::response::{ApiError, Envelope};

/// Payload of the create response.
#[derive(Debug, Clone, Serialize)]
pub struct HouseCreated {
    pub house: House,
}

/// Router builder exposing the house listing endpoints.
pub fn house_router<R>(service: Arc<HouseService<R>>) -> Router
where
    R: HouseRepository + 'static,
{
    Router::new()
        .route(
            "/api/houses",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/houses/landlord", get(my_houses_handler::<R>))
        .route(
            "/api/houses/:house_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .patch(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/landlords/:landlord_id/houses",
            get(landlord_houses_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<HouseService<R>>>,
    AuthenticatedUser(caller): AuthenticatedUser,
    payload: Result<Json<HouseSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<HouseCreated>>), ApiError>
where
    R: HouseRepository + 'static,
{
    let Json(submission) = payload?;
    let house = service.create(caller, submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success_with(
            "House successfully created",
            HouseCreated { house },
        )),
    ))
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<HouseService<R>>>,
    query: Result<Query<HouseFilter>, QueryRejection>,
) -> Result<Json<Vec<House>>, ApiError>
where
    R: HouseRepository + 'static,
{
    let Query(filter) = query?;
    Ok(Json(service.list(&filter).await?))
}

pub(crate) async fn my_houses_handler<R>(
    State(service): State<Arc<HouseService<R>>>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<Json<Vec<House>>, ApiError>
where
    R: HouseRepository + 'static,
{
    Ok(Json(service.list_by_landlord(caller).await?))
}

pub(crate) async fn landlord_houses_handler<R>(
    State(service): State<Arc<HouseService<R>>>,
    Path(landlord_id): Path<String>,
) -> Result<Json<Vec<House>>, ApiError>
where
    R: HouseRepository + 'static,
{
    let landlord: UserId = landlord_id.parse()?;
    Ok(Json(service.list_by_landlord(landlord).await?))
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<HouseService<R>>>,
    Path(house_id): Path<String>,
) -> Result<Json<House>, ApiError>
where
    R: HouseRepository + 'static,
{
    let id: HouseId = house_id.parse()?;
    Ok(Json(service.get(id).await?))
}

/// Ownership is settled before the body is looked at, so a non-owner gets 401
/// even when the payload is malformed.
pub(crate) async fn update_handler<R>(
    State(service): State<Arc<HouseService<R>>>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(house_id): Path<String>,
    payload: Result<Json<HouseUpdate>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    R: HouseRepository + 'static,
{
    let id: HouseId = house_id.parse()?;
    let owned = service.authorize(caller, id, HouseAction::Update).await?;
    let Json(changes) = payload?;
    service.update(owned, changes).await?;
    Ok(Json(Envelope::success("House updated successfully")))
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<HouseService<R>>>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(house_id): Path<String>,
) -> Result<Json<Envelope>, ApiError>
where
    R: HouseRepository + 'static,
{
    let id: HouseId = house_id.parse()?;
    let owned = service.authorize(caller, id, HouseAction::Delete).await?;
    service.delete(owned).await?;
    Ok(Json(Envelope::success("House deleted successfully")))
}

impl From<HouseServiceError> for ApiError {
    fn from(value: HouseServiceError) -> Self {
        match value {
            HouseServiceError::Validation(err) => ApiError::Validation(err.to_string()),
            HouseServiceError::NotFound(_) => ApiError::NotFound(value.to_string()),
            HouseServiceError::NotOwner { action } => {
                ApiError::Unauthorized(action.denial_message().to_string())
            }
            HouseServiceError::Repository(err) => ApiError::from(err),
        }
    }
}
