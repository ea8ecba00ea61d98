use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::auth::TokenAuthority;
use crate::storage::InMemoryStore;

fn authority() -> Arc<TokenAuthority> {
    Arc::new(TokenAuthority::with_ttl("user-tests", Duration::hours(1)))
}

fn build_service() -> (UserService<InMemoryStore>, Arc<InMemoryStore>, Arc<TokenAuthority>) {
    let store = Arc::new(InMemoryStore::new());
    let authority = authority();
    (
        UserService::new(store.clone(), authority.clone()),
        store,
        authority,
    )
}

fn registration() -> Registration {
    Registration {
        first_name: "Ada".to_string(),
        last_name: "Obi".to_string(),
        email: "Ada@Example.com".to_string(),
        password: "s3cret!".to_string(),
        phone_number: "+2348000000000".to_string(),
    }
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn register_stores_a_hashed_password() {
    let (service, store, _) = build_service();

    let user = service.register(registration()).await.expect("registered");
    assert_eq!(user.email, "ada@example.com");

    let stored = store
        .find_by_email("ada@example.com")
        .await
        .expect("lookup succeeds")
        .expect("user stored");
    assert_ne!(stored.password_hash, "s3cret!");
    assert_eq!(stored.user, user);
}

#[tokio::test]
async fn register_twice_is_rejected() {
    let (service, _, _) = build_service();
    service.register(registration()).await.expect("registered");

    let err = service
        .register(registration())
        .await
        .expect_err("duplicate rejected");
    assert!(matches!(err, UserServiceError::AlreadyRegistered));
}

#[tokio::test]
async fn login_issues_a_token_for_the_user() {
    let (service, _, authority) = build_service();
    let user = service.register(registration()).await.expect("registered");

    let token = service
        .login(Credentials {
            email: " ADA@example.com".to_string(),
            password: "s3cret!".to_string(),
        })
        .await
        .expect("logged in");
    assert_eq!(authority.verify(&token).expect("token valid"), user.id);
}

#[tokio::test]
async fn login_distinguishes_unknown_accounts_and_wrong_passwords() {
    let (service, _, _) = build_service();
    service.register(registration()).await.expect("registered");

    let unknown = service
        .login(Credentials {
            email: "nobody@example.com".to_string(),
            password: "s3cret!".to_string(),
        })
        .await
        .expect_err("unknown account");
    assert!(matches!(unknown, UserServiceError::UnknownAccount));

    let wrong = service
        .login(Credentials {
            email: "ada@example.com".to_string(),
            password: "guess".to_string(),
        })
        .await
        .expect_err("wrong password");
    assert!(matches!(wrong, UserServiceError::WrongPassword));
}

/// Count how often a sibling task gets scheduled while `work` runs on the
/// single-threaded test runtime.
async fn ticks_during<F: Future>(work: F) -> (F::Output, usize) {
    let ticks = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let ticker = tokio::spawn({
        let ticks = ticks.clone();
        let stop = stop.clone();
        async move {
            while !stop.load(Ordering::Relaxed) {
                ticks.fetch_add(1, Ordering::Relaxed);
                tokio::task::yield_now().await;
            }
        }
    });

    let output = work.await;
    stop.store(true, Ordering::Relaxed);
    ticker.await.expect("ticker joins");
    (output, ticks.load(Ordering::Relaxed))
}

#[tokio::test]
async fn password_work_leaves_the_runtime_free() {
    let (service, _, _) = build_service();

    let (registered, ticks) = ticks_during(service.register(registration())).await;
    registered.expect("registered");
    assert!(ticks > 0, "runtime stalled while hashing");

    let (logged_in, ticks) = ticks_during(service.login(Credentials {
        email: "ada@example.com".to_string(),
        password: "s3cret!".to_string(),
    }))
    .await;
    logged_in.expect("logged in");
    assert!(ticks > 0, "runtime stalled while verifying");
}

#[tokio::test]
async fn routes_follow_the_status_table() {
    let (service, _, _) = build_service();
    let app = user_router(Arc::new(service));
    let body = serde_json::to_value(registration()).expect("serializes");

    let response = app
        .clone()
        .oneshot(post("/register", body.clone()))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Registered successfully");
    assert_eq!(payload["user"]["email"], "ada@example.com");
    assert!(payload["user"].get("password").is_none());

    let response = app
        .clone()
        .oneshot(post("/register", body))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "status": "failed", "message": "User already registered, please login" })
    );

    let response = app
        .clone()
        .oneshot(post(
            "/login",
            json!({ "email": "ada@example.com", "password": "s3cret!" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "success");
    assert!(payload["token"].as_str().is_some_and(|token| !token.is_empty()));

    let response = app
        .clone()
        .oneshot(post(
            "/login",
            json!({ "email": "ada@example.com", "password": "nope" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(post(
            "/login",
            json!({ "email": "ghost@example.com", "password": "nope" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_route_reports_missing_fields() {
    let (service, _, _) = build_service();
    let app = user_router(Arc::new(service));

    let response = app
        .oneshot(post(
            "/register",
            json!({ "firstname": "Ada", "email": "ada@example.com" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "LastName is required");
}
