//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use auth::models::ADMIN_ROLE;
use axum::Json;
use axum::extract::{Path, State};
use customer::domain::ClientDataRepository;

use crate::application::{PaymentQueryUseCase, ProcessPaymentUseCase, SavePaymentUseCase};
use crate::domain::repository::PaymentRepository;
use crate::error::PaymentResult;
use crate::presentation::dto::{PaymentDto, PaymentRequest, ProcessPaymentResponse};

/// Shared state for payment handlers
pub struct PaymentAppState<P, C>
where
    P: PaymentRepository + Send + Sync + 'static,
    C: ClientDataRepository + Send + Sync + 'static,
{
    pub payments: Arc<P>,
    pub clients: Arc<C>,
}

impl<P, C> Clone for PaymentAppState<P, C>
where
    P: PaymentRepository + Send + Sync + 'static,
    C: ClientDataRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            payments: Arc::clone(&self.payments),
            clients: Arc::clone(&self.clients),
        }
    }
}

/// POST /api/payments/process
pub async fn process<P, C>(
    State(state): State<PaymentAppState<P, C>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<PaymentRequest>,
) -> PaymentResult<Json<ProcessPaymentResponse>>
where
    P: PaymentRepository + Send + Sync + 'static,
    C: ClientDataRepository + Send + Sync + 'static,
{
    let use_case = ProcessPaymentUseCase::new(state.payments.clone(), state.clients.clone());
    let payment = use_case.execute(&principal, req.into()).await?;
    Ok(Json(payment.into()))
}

/// POST /api/payments/save
pub async fn save<P, C>(
    State(state): State<PaymentAppState<P, C>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<PaymentRequest>,
) -> PaymentResult<Json<PaymentDto>>
where
    P: PaymentRepository + Send + Sync + 'static,
    C: ClientDataRepository + Send + Sync + 'static,
{
    let use_case = SavePaymentUseCase::new(state.payments.clone(), state.clients.clone());
    let payment = use_case.execute(&principal, req.into()).await?;
    Ok(Json(payment.into()))
}

/// GET /api/payments/{transaction_id}
pub async fn get<P, C>(
    State(state): State<PaymentAppState<P, C>>,
    Path(transaction_id): Path<String>,
) -> PaymentResult<Json<PaymentDto>>
where
    P: PaymentRepository + Send + Sync + 'static,
    C: ClientDataRepository + Send + Sync + 'static,
{
    let use_case = PaymentQueryUseCase::new(state.payments.clone());
    let payment = use_case.by_transaction_id(&transaction_id).await?;
    Ok(Json(payment.into()))
}

/// GET /api/payments (admin only)
pub async fn list<P, C>(
    State(state): State<PaymentAppState<P, C>>,
    user: CurrentUser,
) -> PaymentResult<Json<Vec<PaymentDto>>>
where
    P: PaymentRepository + Send + Sync + 'static,
    C: ClientDataRepository + Send + Sync + 'static,
{
    user.require_role(ADMIN_ROLE)?;

    let use_case = PaymentQueryUseCase::new(state.payments.clone());
    let payments = use_case.list().await?;
    Ok(Json(payments.into_iter().map(PaymentDto::from).collect()))
}
