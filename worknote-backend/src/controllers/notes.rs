//! Notes REST API: the recorded work notes and full-text search over the vault.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::internal_error;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct SearchNotesQuery {
    query: String,
    limit: Option<i32>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/obsidian/notes")
            .route("", web::get().to(list_notes))
            .route("/search", web::get().to(search_notes)),
    );
}

async fn list_notes(state: web::Data<AppState>) -> impl Responder {
    match state.db.list_work_notes() {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => internal_error("Failed to list notes", e),
    }
}

async fn search_notes(state: web::Data<AppState>, query: web::Query<SearchNotesQuery>) -> impl Responder {
    let limit = query.limit.unwrap_or(20).clamp(1, 50);

    match state.pipeline.notes.search(&query.query, limit) {
        Ok(results) => HttpResponse::Ok().json(serde_json::json!({
            "query": query.query,
            "results": results
        })),
        Err(e) => internal_error("Search failed", e),
    }
}
