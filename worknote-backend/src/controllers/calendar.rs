//! Calendar REST API: list, create, update and delete events.

use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;

use super::{bad_request, internal_error, not_found};
use crate::analysis::date_utils::get_date_range;
use crate::db::now_local;
use crate::models::CalendarEventRequest;
use crate::AppState;

const SUMMARY_MAX_CHARS: usize = 128;
const EVENT_NOT_FOUND: &str = "일정을 찾을 수 없습니다";

#[derive(Debug, Deserialize)]
struct EventsQuery {
    /// Date expression ("2024-03-01", "내일", ...); without it every event is listed
    start: Option<String>,
    /// Defaults to one week after `start`
    end: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/calendar/events")
            .route("", web::get().to(list_events))
            .route("", web::post().to(create_event))
            .route("/{id}", web::put().to(update_event))
            .route("/{id}", web::delete().to(delete_event)),
    );
}

fn validate(request: &CalendarEventRequest) -> Result<(), HttpResponse> {
    let chars = request.summary.trim().chars().count();
    if chars == 0 {
        return Err(bad_request("summary must not be empty"));
    }
    if chars > SUMMARY_MAX_CHARS {
        return Err(bad_request(format!(
            "summary must be at most {} characters",
            SUMMARY_MAX_CHARS
        )));
    }
    if request.end < request.start {
        return Err(bad_request("end must not be before start"));
    }
    Ok(())
}

/// Range bounds are whole days, whatever the clock time a relative expression carries
fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

async fn list_events(state: web::Data<AppState>, query: web::Query<EventsQuery>) -> impl Responder {
    let result = match query.start.as_deref() {
        Some(start) => {
            let (from, to) = get_date_range(start, query.end.as_deref(), now_local());
            state.db.list_calendar_events_between(start_of_day(from), start_of_day(to))
        }
        None => state.db.list_calendar_events(),
    };

    match result {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => internal_error("Failed to list calendar events", e),
    }
}

async fn create_event(
    state: web::Data<AppState>,
    body: web::Json<CalendarEventRequest>,
) -> impl Responder {
    if let Err(resp) = validate(&body) {
        return resp;
    }

    match state.db.create_calendar_event(
        body.summary.trim(),
        body.description.as_deref(),
        body.start,
        body.end,
        &body.user_id,
    ) {
        Ok(event) => {
            log::info!("[CALENDAR] Created event {} via API", event.id);
            HttpResponse::Ok().json(event)
        }
        Err(e) => internal_error("Failed to create calendar event", e),
    }
}

async fn update_event(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<CalendarEventRequest>,
) -> impl Responder {
    if let Err(resp) = validate(&body) {
        return resp;
    }

    match state.db.update_calendar_event(path.into_inner(), &body) {
        Ok(Some(event)) => HttpResponse::Ok().json(event),
        Ok(None) => not_found(EVENT_NOT_FOUND),
        Err(e) => internal_error("Failed to update calendar event", e),
    }
}

async fn delete_event(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.db.delete_calendar_event(path.into_inner()) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "message": "일정이 삭제되었습니다" })),
        Ok(false) => not_found(EVENT_NOT_FOUND),
        Err(e) => internal_error("Failed to delete calendar event", e),
    }
}
