use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use rielz::auth::TokenAuthority;
use rielz::houses::{house_router, HouseService};
use rielz::response::Envelope;
use rielz::storage::Store;
use rielz::tenants::{tenant_router, TenantService};
use rielz::users::{user_router, UserService};
use serde_json::json;
use std::sync::Arc;

/// Every feature router over one store, plus the operational endpoints.
///
/// The returned router still expects an [`AppState`] extension for `/ready`
/// and `/metrics`.
pub(crate) fn build_router<S>(store: Arc<S>, authority: Arc<TokenAuthority>) -> Router
where
    S: Store,
{
    Router::new()
        .route("/", get(home))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(user_router(Arc::new(UserService::new(
            store.clone(),
            authority.clone(),
        ))))
        .merge(house_router(Arc::new(HouseService::new(store.clone()))))
        .merge(tenant_router(Arc::new(TenantService::new(store))))
        .layer(Extension(authority))
}

pub(crate) async fn home() -> Json<Envelope> {
    Json(Envelope::success("Welcome To Rielz"))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.is_ready();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Duration;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use rielz::storage::InMemoryStore;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let state = AppState::new(PrometheusBuilder::new().build_recorder().handle());
        let authority = Arc::new(TokenAuthority::with_ttl("routes", Duration::hours(1)));
        let router =
            build_router(Arc::new(InMemoryStore::new()), authority).layer(Extension(state.clone()));
        (router, state)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn home_and_health_respond() {
        let (router, _) = app();
        let (status, body) = get_json(router.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "success", "message": "Welcome To Rielz" })
        );

        let (status, body) = get_json(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (router, state) = app();
        let (status, body) = get_json(router.clone(), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        state.mark_ready(true);
        let (status, body) = get_json(router, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn feature_routes_are_mounted() {
        let (router, _) = app();
        let (status, body) = get_json(router.clone(), "/api/houses").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, _) = get_json(router, "/api/houses/landlord").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn metrics_render_as_text() {
        let (router, _) = app();
        let response = router
            .oneshot(
                Request::get("/metrics")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&header::HeaderValue::from_static("text/plain; version=0.0.4"))
        );
    }
}
