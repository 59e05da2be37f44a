//! HTTP API module for the payroll sheets engine.
//!
//! This module provides the REST endpoint that normalizes a payroll export
//! and returns the records grouped per operator.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PeriodRequest, ProcessRequest};
pub use response::{ApiError, ApiErrorResponse, ProcessResponse};
pub use state::AppState;
