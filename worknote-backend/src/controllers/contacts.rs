use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::internal_error;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contacts")
            .route("", web::get().to(list_contacts))
            .route("/search", web::get().to(search_contacts)),
    );
}

async fn list_contacts(state: web::Data<AppState>) -> impl Responder {
    match state.pipeline.contacts.list_contacts() {
        Ok(contacts) => HttpResponse::Ok().json(contacts),
        Err(e) => internal_error("Failed to list contacts", e),
    }
}

/// Substring match on name, company or e-mail
async fn search_contacts(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> impl Responder {
    match state.pipeline.contacts.search_contacts(query.query.trim()) {
        Ok(contacts) => HttpResponse::Ok().json(contacts),
        Err(e) => internal_error("Failed to search contacts", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::app_state;
    use crate::models::WorkInput;
    use actix_web::{test, App};
    use serde_json::Value;
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_list_and_search() {
        let dir = tempdir().unwrap();
        let state = app_state(&dir);
        for text in ["김철수님께 kim@ace.com 으로 회신", "박영희님 보고서 검토 완료"] {
            let input = WorkInput {
                text: text.to_string(),
                user_id: "u1".to_string(),
                timestamp: None,
            };
            state.pipeline.process_work_input(&input).await;
        }
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get().uri("/contacts").to_request();
        let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        let names: Vec<&str> = all.iter().map(|c| c["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["김철수", "박영희"]);

        let req = test::TestRequest::get().uri("/contacts/search?query=ace").to_request();
        let found: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["emails"][0], "kim@ace.com");
    }
}
