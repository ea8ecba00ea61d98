use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::build_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rielz::auth::TokenAuthority;
use rielz::config::AppConfig;
use rielz::error::AppError;
use rielz::storage::{InMemoryStore, PgStore, Store};
use rielz::telemetry;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;
    if config.auth.uses_development_secret() {
        warn!("APP_JWT_SECRET is not set, tokens are signed with the development secret");
    }

    let authority = Arc::new(TokenAuthority::new(&config.auth));

    match &config.database {
        Some(database) => {
            let store = PgStore::connect(database).await?;
            store.migrate().await?;
            info!("database migrations applied");
            serve(&config, Arc::new(store), authority).await
        }
        None => {
            warn!("no database configured, listings are kept in memory only");
            serve(&config, Arc::new(InMemoryStore::new()), authority).await
        }
    }
}

/// Apply the schema migrations against the configured database.
pub(crate) async fn migrate() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = PgStore::connect(config.require_database()?).await?;
    store.migrate().await?;
    info!("database migrations applied");
    Ok(())
}

async fn serve<S>(
    config: &AppConfig,
    store: Arc<S>,
    authority: Arc<TokenAuthority>,
) -> Result<(), AppError>
where
    S: Store,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(prometheus_handle);

    let app = build_router(store, authority)
        .layer(Extension(app_state.clone()))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    app_state.mark_ready(true);

    info!(environment = ?config.environment, %addr, "rielz api ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(app_state))
        .await?;
    info!("rielz api stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    state.mark_ready(false);
    info!("shutdown signal received, draining connections");
}
