use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::api::{AdvocatesQuery, AdvocatesResponse};
use crate::repository::DieselRepository;
use crate::routes::{blocking_failure, service_error_response};
use crate::services::advocates::{get_advocate, load_filter_options, search_advocates};

#[get("/advocates")]
pub async fn list_advocates(
    params: web::Query<AdvocatesQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = params.query_description();
    let page = params.page_request();

    let result = web::block(move || search_advocates(repo.get_ref(), &query, page)).await;

    match result {
        Ok(Ok(page)) => HttpResponse::Ok().json(AdvocatesResponse::from(page)),
        Ok(Err(err)) => service_error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[get("/advocates/filters")]
pub async fn advocate_filters(repo: web::Data<DieselRepository>) -> impl Responder {
    match web::block(move || load_filter_options(repo.get_ref())).await {
        Ok(Ok(options)) => HttpResponse::Ok().json(options),
        Ok(Err(err)) => service_error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[get("/advocates/{advocate_id}")]
pub async fn show_advocate(
    advocate_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let advocate_id = advocate_id.into_inner();

    match web::block(move || get_advocate(repo.get_ref(), advocate_id)).await {
        Ok(Ok(advocate)) => HttpResponse::Ok().json(advocate),
        Ok(Err(err)) => service_error_response(&err),
        Err(err) => blocking_failure(err),
    }
}
