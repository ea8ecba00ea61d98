use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::{Extension, Router};
use chrono::Duration;
use serde_json::Value;

use crate::auth::TokenAuthority;
use crate::houses::{
    house_router, House, HouseRepository, HouseService, HouseSubmission, HouseUpdate, NewHouse,
};
use crate::ids::{HouseId, UserId};
use crate::storage::{InMemoryStore, RepositoryError};

pub(super) const OWNER: UserId = UserId(7);
pub(super) const STRANGER: UserId = UserId(9);

pub(super) fn submission() -> HouseSubmission {
    HouseSubmission {
        house_type: "Duplex".to_string(),
        state: "Lagos".to_string(),
        description: "Three bedroom duplex".to_string(),
        location: "  12 Elm St  ".to_string(),
        rooms: 3,
        available_rooms: 2,
        bathrooms: 2,
        price: 1500,
        long_lat: "6.45,3.39".to_string(),
    }
}

pub(super) fn build_service() -> (HouseService<InMemoryStore>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (HouseService::new(store.clone()), store)
}

pub(super) async fn seeded_house(store: &InMemoryStore, owner: UserId) -> House {
    let mut listing = submission();
    listing.prepare();
    store
        .insert(listing.owned_by(owner))
        .await
        .expect("house inserted")
}

pub(super) fn authority() -> Arc<TokenAuthority> {
    Arc::new(TokenAuthority::with_ttl("house-tests", Duration::hours(1)))
}

pub(super) fn house_app(store: Arc<InMemoryStore>, authority: Arc<TokenAuthority>) -> Router {
    house_router(Arc::new(HouseService::new(store))).layer(Extension(authority))
}

pub(super) fn bearer(authority: &TokenAuthority, user: UserId) -> String {
    let token = authority.issue(user).expect("token issued");
    format!("Bearer {token}")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: impl Into<Body>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(body.into()).expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableRepository;

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

#[async_trait]
impl HouseRepository for UnavailableRepository {
    async fn insert(&self, _house: NewHouse) -> Result<House, RepositoryError> {
        Err(offline())
    }

    async fn list(&self) -> Result<Vec<House>, RepositoryError> {
        Err(offline())
    }

    async fn list_by_landlord(&self, _landlord: UserId) -> Result<Vec<House>, RepositoryError> {
        Err(offline())
    }

    async fn list_by_state(&self, _state: &str) -> Result<Vec<House>, RepositoryError> {
        Err(offline())
    }

    async fn fetch(&self, _id: HouseId) -> Result<Option<House>, RepositoryError> {
        Err(offline())
    }

    async fn update(&self, _id: HouseId, _changes: HouseUpdate) -> Result<House, RepositoryError> {
        Err(offline())
    }

    async fn delete(&self, _id: HouseId) -> Result<(), RepositoryError> {
        Err(offline())
    }
}
