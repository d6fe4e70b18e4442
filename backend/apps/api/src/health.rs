//! Health endpoint
//!
//! Reports whether the database and the ClamAV daemon are reachable.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use platform::clamav::ClamdClient;
use serde::Serialize;
use sqlx::PgPool;

#[derive(Clone)]
pub struct HealthState {
    pub pool: PgPool,
    pub clamd: ClamdClient,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthReport {
    pub status: &'static str,
    pub database: &'static str,
    pub clamav: &'static str,
}

impl HealthReport {
    pub fn new(database_up: bool, clamav_up: bool) -> Self {
        let label = |up: bool| if up { "UP" } else { "DOWN" };
        Self {
            status: label(database_up && clamav_up),
            database: label(database_up),
            clamav: label(clamav_up),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if self.status == "UP" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let database_up = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            false
        }
    };

    let clamav_up = match state.clamd.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, address = %state.clamd.config().address(), "Health check: ClamAV unreachable");
            false
        }
    };

    let report = HealthReport::new(database_up, clamav_up);
    (report.status_code(), Json(report))
}
