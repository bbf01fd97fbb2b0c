use actix_web::error::BlockingError;
use actix_web::{HttpResponse, Responder, get};

use crate::dto::api::ErrorResponse;
use crate::services::ServiceError;

pub mod api;

/// Maps a service failure onto a JSON error body. Internal causes never reach
/// the caller.
pub fn service_error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(ErrorResponse::new("Not Found")),
        ServiceError::Validation(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(message.clone()))
        }
        ServiceError::Internal => HttpResponse::InternalServerError()
            .json(ErrorResponse::new("Internal Server Error")),
    }
}

pub(crate) fn blocking_failure(err: BlockingError) -> HttpResponse {
    log::error!("Blocking task failed: {err}");
    service_error_response(&ServiceError::Internal)
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().finish()
}
