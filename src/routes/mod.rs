// Route exports
pub mod jobs;
pub mod matches;
pub mod profiles;

use actix_web::{http::StatusCode, web, HttpResponse};
use crate::core::{MatchError, ProfileError};
use crate::models::ErrorResponse;
use crate::services::StoreError;

pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(jobs::configure)
            .configure(profiles::configure),
    );
}

/// Resolve an optional query limit against a default
///
/// Negative values are rejected here; zero and the upper cap are handled by
/// the finder.
pub(crate) fn requested_limit(raw: Option<i64>, default: usize) -> Result<usize, MatchError> {
    match raw {
        None => Ok(default),
        Some(value) => usize::try_from(value)
            .map_err(|_| MatchError::InvalidInput(format!("limit must be positive, got {}", value))),
    }
}

pub(crate) fn error_response(status_code: u16, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)).json(
        ErrorResponse {
            error: error.to_string(),
            message,
            status_code,
        },
    )
}

pub(crate) fn match_error_response(err: &MatchError) -> HttpResponse {
    let error = match err {
        MatchError::NotFound(_) => "Not found",
        MatchError::NoActiveProfile(_) => "No active profile",
        MatchError::InvalidInput(_) => "Invalid input",
        MatchError::Store(_) => "Store error",
    };

    let status_code = err.status_code();
    if status_code >= 500 {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::info!("Request rejected: {}", err);
    }

    error_response(status_code, error, err.to_string())
}

pub(crate) fn store_error_response(err: &StoreError) -> HttpResponse {
    let (status_code, error) = match err {
        StoreError::SeekerNotFound(_) | StoreError::Profile(ProfileError::NotFound(_)) => (404, "Not found"),
        StoreError::NoActiveProfile(_) => (404, "No active profile"),
        StoreError::Profile(ProfileError::CapacityExceeded(_)) => (400, "Profile limit reached"),
        StoreError::Profile(ProfileError::LastProfile) => (400, "Cannot delete profile"),
        StoreError::Io(_) | StoreError::Parse(_) => (500, "Store error"),
    };

    if status_code >= 500 {
        tracing::error!("Store operation failed: {}", err);
    }

    error_response(status_code, error, err.to_string())
}
