//! HTTP API module for the employment law engine.
//!
//! This module provides the REST endpoint evaluating one case per request.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    DEFAULT_HORIZON_YEARS, EvaluationRequest, PeriodRequest, TerminationRequest, TrialRequest,
};
pub use response::{ApiError, ApiErrorResponse, EvaluationResponse};
pub use state::AppState;
