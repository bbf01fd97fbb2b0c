use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod advocates;

/// Failures surfaced by the service layer to routes and the controller.
///
/// `Internal` carries no detail; the cause is logged where it happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            _ => ServiceError::Internal,
        }
    }
}
