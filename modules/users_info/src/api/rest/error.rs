use modkit::api::ApiError;

use crate::domain::error::DomainError;

/// Map domain errors onto the plain-text API boundary.
pub fn map_domain_error(e: DomainError) -> ApiError {
    match e {
        DomainError::UserNotFound { .. } | DomainError::NoUsers => {
            ApiError::not_found(e.to_string())
        }
        DomainError::Storage { .. } => ApiError::internal(e.to_string()),
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        map_domain_error(e)
    }
}
