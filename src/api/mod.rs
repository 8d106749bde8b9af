//! HTTP API for the advance engine.
//!
//! Exposes accrual, quoting, submission, lookup and status transitions over
//! JSON. Every handler tags its log lines with a per-request correlation id.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AdvanceAmountRequest, TransitionRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
