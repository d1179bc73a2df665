use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::{bad_request, internal_error};
use crate::models::TaskStatus;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gantt/tasks")
            .route("", web::get().to(list_tasks))
            .route("/{id}/status", web::put().to(update_status))
            .route("/{id}", web::delete().to(delete_task)),
    );
}

async fn list_tasks(state: web::Data<AppState>) -> impl Responder {
    match state.pipeline.gantt.list_tasks() {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(e) => internal_error("Failed to list tasks", e),
    }
}

async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<StatusQuery>,
) -> impl Responder {
    // Strict parse here; from_str_or_default is only for rows already stored
    let status: TaskStatus = match query.status.parse() {
        Ok(status) => status,
        Err(_) => {
            return bad_request(format!(
                "Unknown status '{}' (expected pending, in_progress or completed)",
                query.status
            ))
        }
    };

    match state.pipeline.gantt.update_task_status(path.into_inner(), status) {
        Ok(Some(task)) => HttpResponse::Ok().json(task),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "Task not found" })),
        Err(e) => internal_error("Failed to update task", e),
    }
}

async fn delete_task(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.pipeline.gantt.delete_task(path.into_inner()) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Task deleted successfully"
        })),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Task not found"
        })),
        Err(e) => internal_error("Failed to delete task", e),
    }
}
