//! Work-input endpoints: the full pipeline and a dry-run analysis

use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDateTime;
use serde::Serialize;

use super::bad_request;
use crate::analysis::date_utils::{is_relative_date, parse_date, parse_time};
use crate::models::WorkInput;
use crate::AppState;

#[derive(Debug, Serialize)]
struct NormalizedDate {
    text: String,
    value: NaiveDateTime,
    relative: bool,
}

#[derive(Debug, Serialize)]
struct NormalizedTime {
    text: String,
    value: NaiveDateTime,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/process_work_input", web::post().to(process_work_input))
        .route("/analyze", web::post().to(analyze));
}

/// Analyze, classify and dispatch a note to its sinks
async fn process_work_input(state: web::Data<AppState>, body: web::Json<WorkInput>) -> impl Responder {
    if body.text.trim().is_empty() {
        return bad_request("text must not be empty");
    }

    let output = state.pipeline.process_work_input(&body).await;
    HttpResponse::Ok().json(output)
}

/// Analysis, summary, classification and per-category keyword hits, without writing anything
async fn analyze(state: web::Data<AppState>, body: web::Json<WorkInput>) -> impl Responder {
    if body.text.trim().is_empty() {
        return bad_request("text must not be empty");
    }

    let (analysis, classification) = state.pipeline.analyze(&body);
    let summary = state.pipeline.analyzer().summarize(&body.text);
    let classifier = state.pipeline.classifier();

    let normalized_dates: Vec<NormalizedDate> = analysis
        .dates
        .iter()
        .map(|d| NormalizedDate {
            text: d.clone(),
            value: parse_date(d, analysis.reference),
            relative: is_relative_date(d),
        })
        .collect();
    let normalized_times: Vec<NormalizedTime> = analysis
        .times
        .iter()
        .map(|t| NormalizedTime {
            text: t.clone(),
            value: parse_time(t, analysis.reference),
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "analysis": analysis,
        "summary": summary,
        "classification": classification,
        "keyword_hits": {
            "schedule": classifier.is_schedule(&body.text),
            "meeting": classifier.is_meeting(&body.text),
            "work_log": classifier.is_work_log(&body.text)
        },
        "normalized_dates": normalized_dates,
        "normalized_times": normalized_times
    }))
}
