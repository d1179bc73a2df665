use actix_web::{web, HttpResponse, Responder};

use crate::config::defaults;
use crate::db::now_local;
use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "server": defaults::SERVER_NAME,
        "version": VERSION,
        "timestamp": now_local(),
        "uptime_secs": state.started_at.elapsed().as_secs()
    }))
}
