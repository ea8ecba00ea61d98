//! End-to-end scenarios through the merged feature routers: a landlord signs up,
//! logs in, manages listings and admits a tenant while another landlord is kept
//! out of their houses.

mod common {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use axum::{Extension, Router};
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use rielz::auth::TokenAuthority;
    use rielz::houses::{house_router, HouseService};
    use rielz::storage::InMemoryStore;
    use rielz::tenants::{tenant_router, TenantService};
    use rielz::users::{user_router, UserService};

    pub(super) fn app() -> Router {
        let store = Arc::new(InMemoryStore::new());
        let authority = Arc::new(TokenAuthority::with_ttl("lifecycle", Duration::hours(1)));
        Router::new()
            .merge(user_router(Arc::new(UserService::new(
                store.clone(),
                authority.clone(),
            ))))
            .merge(house_router(Arc::new(HouseService::new(store.clone()))))
            .merge(tenant_router(Arc::new(TenantService::new(store))))
            .layer(Extension(authority))
    }

    pub(super) async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("request builds");
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        let status = response.status().as_u16();
        (status, read_json_body(response).await)
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    /// Register and log in a landlord, returning their id and bearer token.
    pub(super) async fn landlord(app: &Router, email: &str) -> (i64, String) {
        let (status, registered) = send(
            app,
            "POST",
            "/register",
            None,
            Some(
                json!({
                    "firstname": "Ngozi",
                    "lastname": "Okafor",
                    "email": email,
                    "password": "correct horse",
                    "phonenumber": "08031234567"
                })
                .to_string(),
            ),
        )
        .await;
        assert_eq!(status, 201, "registration failed: {registered}");
        let id = registered["user"]["id"].as_i64().expect("user id");

        let (status, logged_in) = send(
            app,
            "POST",
            "/login",
            None,
            Some(json!({ "email": email, "password": "correct horse" }).to_string()),
        )
        .await;
        assert_eq!(status, 200, "login failed: {logged_in}");
        let token = logged_in["token"].as_str().expect("token").to_string();
        (id, token)
    }

    pub(super) fn listing(location: &str, available_rooms: i32) -> String {
        json!({
            "house_type": "Terrace",
            "state": "Lagos",
            "description": "Two bedroom terrace",
            "location": location,
            "rooms": 2,
            "available_rooms": available_rooms,
            "bathrooms": 1,
            "price": 1200,
            "long_lat": "6.52,3.37"
        })
        .to_string()
    }
}

use common::*;
use serde_json::json;

#[tokio::test]
async fn landlord_manages_their_listing_end_to_end() {
    let app = app();
    let (owner_id, token) = landlord(&app, "ngozi@example.com").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/houses",
        Some(&token),
        Some(listing("  12 Elm St  ", 1)),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["house"]["location"], "12 Elm St");
    assert_eq!(created["house"]["user_id"], owner_id);
    let house_id = created["house"]["id"].as_i64().expect("house id");
    let house_uri = format!("/api/houses/{house_id}");

    let (status, updated) = send(
        &app,
        "PUT",
        &house_uri,
        Some(&token),
        Some(json!({ "price": 1350 }).to_string()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        updated,
        json!({ "status": "success", "message": "House updated successfully" })
    );

    let (status, fetched) = send(&app, "GET", &house_uri, None, None).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["price"], 1350);
    assert_eq!(fetched["location"], "12 Elm St");

    let (status, admitted) = send(
        &app,
        "POST",
        "/api/houses/tenant",
        Some(&token),
        Some(
            json!({
                "email": "tolu@example.com",
                "firstname": "Tolu",
                "lastname": "Ade",
                "phonenumber": "0809",
                "house_id": house_id
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, 201, "admission failed: {admitted}");
    let (_, fetched) = send(&app, "GET", &house_uri, None, None).await;
    assert_eq!(fetched["available_rooms"], 0);

    let (status, _) = send(&app, "DELETE", &house_uri, Some(&token), None).await;
    assert_eq!(status, 200);
    let (status, gone) = send(&app, "DELETE", &house_uri, Some(&token), None).await;
    assert_eq!(status, 404);
    assert_eq!(gone["status"], "failed");
    let (status, _) = send(&app, "GET", &house_uri, None, None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn other_landlords_cannot_touch_a_listing() {
    let app = app();
    let (_, owner_token) = landlord(&app, "owner@example.com").await;
    let (_, other_token) = landlord(&app, "other@example.com").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/houses",
        Some(&owner_token),
        Some(listing("5 Bode Thomas", 2)),
    )
    .await;
    let house_uri = format!("/api/houses/{}", created["house"]["id"]);

    let (status, denied) = send(
        &app,
        "PUT",
        &house_uri,
        Some(&other_token),
        Some(json!({ "price": 1 }).to_string()),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(
        denied,
        json!({ "status": "failed", "message": "Unauthorized house update" })
    );

    let (status, denied) = send(&app, "DELETE", &house_uri, Some(&other_token), None).await;
    assert_eq!(status, 401);
    assert_eq!(denied["message"], "Unauthorized house delete");

    let (_, fetched) = send(&app, "GET", &house_uri, None, None).await;
    assert_eq!(fetched["price"], 1200);

    let (_, mine) = send(&app, "GET", "/api/houses/landlord", Some(&other_token), None).await;
    assert_eq!(mine, json!([]));
    let (_, everything) = send(&app, "GET", "/api/houses", None, None).await;
    assert_eq!(everything.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn bad_requests_never_reach_storage() {
    let app = app();
    let (_, token) = landlord(&app, "careful@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/houses",
        Some(&token),
        Some("{\"house_type\": \"Flat\",".to_string()),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "failed");

    let (status, _) = send(&app, "GET", "/api/houses/not-a-number", None, None).await;
    assert_eq!(status, 400);
    let (status, _) = send(&app, "GET", "/api/houses/999", None, None).await;
    assert_eq!(status, 404);

    let (status, _) = send(
        &app,
        "POST",
        "/api/houses",
        Some("tampered.token.value"),
        Some(listing("1 Nowhere", 1)),
    )
    .await;
    assert_eq!(status, 401);

    let (_, everything) = send(&app, "GET", "/api/houses", None, None).await;
    assert_eq!(everything, json!([]));
}
