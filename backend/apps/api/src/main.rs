//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod health;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::middleware::{JwtAuthState, require_jwt};
use auth::{AuthConfig, JwksVerifier, KeycloakAdminClient, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use catalog::{PgCatalogRepository, catalog_router, debug_router};
use customer::{PgClientDataRepository, customer_router};
use payment::{PgPaymentRepository, payment_router};
use platform::clamav::{ClamdClient, ClamdConfig};
use platform::config::{env_or, env_parse_or, require_env};
use platform::image::{DEFAULT_MAX_IMAGE_BYTES, ImageValidator};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::health::HealthState;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_FRONTEND_ORIGINS: &str =
    "http://localhost:5173,https://localhost:5173,http://frontend:5173,https://frontend:5173";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api=info,auth=info,catalog=info,customer=info,payment=info,platform=info,tower_http=info"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = require_env("DATABASE_URL")?;

    let pool = PgPoolOptions::new()
        .max_connections(env_parse_or("DATABASE_MAX_CONNECTIONS", 5u32)?)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Keycloak: token verification and the admin API used for registration
    let auth_config = Arc::new(AuthConfig::from_env()?);
    let verifier = JwksVerifier::new(&auth_config)?;
    // Keys are fetched lazily on the first token if Keycloak is not up yet
    match verifier.refresh().await {
        Ok(keys) => tracing::info!(keys, "JWKS preloaded"),
        Err(e) => tracing::warn!(error = %e, "JWKS preload failed, continuing anyway"),
    }
    let keycloak = KeycloakAdminClient::new(auth_config.clone())?;

    // ClamAV and the shared image pipeline
    let clamd = ClamdClient::new(ClamdConfig::from_env()?);
    tracing::info!(address = %clamd.config().address(), "ClamAV configured");
    let images = ImageValidator::new(
        Arc::new(clamd.clone()),
        env_parse_or("IMAGE_MAX_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
    );

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = env_or("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS)
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ]))
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ]))
        .expose_headers(ExposeHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
        ]))
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let jwt_state = JwtAuthState::new(Arc::new(verifier), auth_config.clone());
    let health_state = HealthState {
        pool: pool.clone(),
        clamd,
    };

    // Build router
    let catalog_repo = PgCatalogRepository::new(pool.clone());
    let clients = PgClientDataRepository::new(pool.clone());

    let app = Router::new()
        .nest("/auth", auth_router(keycloak.clone(), auth_config.clone()))
        .nest("/api/auth", auth_router(keycloak, auth_config))
        .nest("/api/products", catalog_router(catalog_repo.clone(), images.clone()))
        .nest("/api/test", debug_router(catalog_repo))
        .nest("/api/client-data", customer_router(clients.clone(), images))
        .nest(
            "/api/payments",
            payment_router(PgPaymentRepository::new(pool.clone()), clients),
        )
        .merge(
            Router::new()
                .route("/health", get(health::health))
                .route("/actuator/health", get(health::health))
                .with_state(health_state),
        )
        .layer(middleware::from_fn_with_state(
            jwt_state,
            require_jwt::<JwksVerifier>,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env_parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
