//! Live counts for the dashboard's metric cards

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::internal_error;
use crate::db::{DailyCount, TaskStatusCounts};
use crate::AppState;

const TOP_TAGS: usize = 10;

#[derive(Debug, Deserialize)]
struct StatsQuery {
    days: Option<i64>,
}

#[derive(Debug, Serialize)]
struct TaskStats {
    total: i64,
    #[serde(flatten)]
    by_status: TaskStatusCounts,
}

#[derive(Debug, Serialize)]
struct TagCount {
    tag: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct DashboardStats {
    tasks: TaskStats,
    calendar_events: i64,
    notes: i64,
    contacts: i64,
    daily_completed: Vec<DailyCount>,
    top_tags: Vec<TagCount>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard/stats", web::get().to(stats));
}

fn collect_stats(state: &AppState, days: i64) -> Result<DashboardStats, String> {
    let db = &state.db;
    let by_status = db.count_gantt_tasks_by_status().map_err(|e| e.to_string())?;
    let mut tags = state.note_store.list_tags().map_err(|e| e.to_string())?;
    tags.truncate(TOP_TAGS);

    Ok(DashboardStats {
        tasks: TaskStats {
            total: by_status.total(),
            by_status,
        },
        calendar_events: db.count_calendar_events().map_err(|e| e.to_string())?,
        notes: db.count_work_notes().map_err(|e| e.to_string())?,
        contacts: db.count_contacts().map_err(|e| e.to_string())?,
        daily_completed: db.daily_completed_tasks(days).map_err(|e| e.to_string())?,
        top_tags: tags
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect(),
    })
}

async fn stats(state: web::Data<AppState>, query: web::Query<StatsQuery>) -> impl Responder {
    let days = query.days.unwrap_or(7).clamp(1, 365);

    match collect_stats(&state, days) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => internal_error("Failed to collect dashboard stats", e),
    }
}
