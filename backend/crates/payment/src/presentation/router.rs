//! Payment Router

use axum::{
    Router,
    routing::{get, post},
};
use customer::PgClientDataRepository;
use customer::domain::ClientDataRepository;
use std::sync::Arc;

use crate::domain::repository::PaymentRepository;
use crate::infra::postgres::PgPaymentRepository;
use crate::presentation::handlers::{self, PaymentAppState};

/// Create the payment router (`/api/payments`) with PostgreSQL storage
pub fn payment_router(payments: PgPaymentRepository, clients: PgClientDataRepository) -> Router {
    payment_router_generic(payments, clients)
}

/// Create a generic payment router for any repositories
pub fn payment_router_generic<P, C>(payments: P, clients: C) -> Router
where
    P: PaymentRepository + Send + Sync + 'static,
    C: ClientDataRepository + Send + Sync + 'static,
{
    let state = PaymentAppState {
        payments: Arc::new(payments),
        clients: Arc::new(clients),
    };

    Router::new()
        .route("/", get(handlers::list::<P, C>))
        .route("/process", post(handlers::process::<P, C>))
        .route("/save", post(handlers::save::<P, C>))
        .route("/{transaction_id}", get(handlers::get::<P, C>))
        .with_state(state)
}
