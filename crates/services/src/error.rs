//! Shared error types for the services crate.

use thiserror::Error;

use api::{ApiError, SessionStoreError};
use prep_core::model::ScoreSummaryError;

/// Errors emitted by the attempt services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("no questions available for this practice scope")]
    Empty,

    #[error("attempt already completed")]
    Completed,

    #[error(transparent)]
    Summary(#[from] ScoreSummaryError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `CatalogService` — the visible-banner data-load paths.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `PerformanceService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PerformanceError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid email or password")]
    BadCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Api(ApiError),

    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        if let ApiError::HttpStatus(status) = &err {
            // 401 and 409 have user-facing meanings on the auth endpoints.
            if status.as_u16() == 401 {
                return AuthError::BadCredentials;
            }
            if status.as_u16() == 409 {
                return AuthError::EmailTaken;
            }
        }
        AuthError::Api(err)
    }
}
