//! Application Layer
//!
//! Use cases for recording and reading payments.

pub mod common;
pub mod process_payment;
pub mod query_payments;
pub mod save_payment;

// Re-exports
pub use common::{MAX_PURCHASE_ID_ATTEMPTS, PaymentInput};
pub use process_payment::ProcessPaymentUseCase;
pub use query_payments::PaymentQueryUseCase;
pub use save_payment::SavePaymentUseCase;
