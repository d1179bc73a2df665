//! HTTP handlers, one module per resource

use actix_web::HttpResponse;

pub mod calendar;
pub mod contacts;
pub mod dashboard;
pub mod gantt;
pub mod health;
pub mod notes;
pub mod work_input;

/// Log and wrap a failure as a 500 JSON body
pub(crate) fn internal_error(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    log::error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": format!("{}: {}", context, e)
    }))
}

pub(crate) fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.into() }))
}

pub(crate) fn not_found(message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": message.into() }))
}
