use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Instant;

mod analysis;
mod config;
mod controllers;
mod db;
mod error;
mod models;
mod notes;
mod pipeline;
mod tools;

use config::Config;
use db::Database;
use notes::NoteStore;
use pipeline::WorkPipeline;

pub struct AppState {
    pub db: Arc<Database>,
    pub note_store: Arc<NoteStore>,
    pub pipeline: Arc<WorkPipeline>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Arc<Database>, note_store: Arc<NoteStore>) -> Self {
        let pipeline = Arc::new(WorkPipeline::new(db.clone(), note_store.clone()));
        Self {
            db,
            note_store,
            pipeline,
            started_at: Instant::now(),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("{} v{}", config::defaults::SERVER_NAME, env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let notes_config = config::notes_config();
    config::initialize_directories(&config, &notes_config)?;

    log::info!("Opening database at {}", config.database_url);
    let db = Database::new(&config.database_url).map_err(std::io::Error::other)?;

    let note_store = NoteStore::new(
        notes_config.notes_dir.clone().into(),
        &notes_config.notes_db_path(),
    )
    .map_err(std::io::Error::other)?;
    log::info!("[NOTES] Vault ready at {}", note_store.notes_dir().display());

    let state = web::Data::new(AppState::new(Arc::new(db), Arc::new(note_store)));

    let dashboard_dir = config::dashboard_dir();
    match &dashboard_dir {
        Some(dir) => log::info!("Serving dashboard from {}", dir),
        None => log::info!("No dashboard assets configured, API only"),
    }

    log::info!("Starting server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::work_input::config)
            .configure(controllers::calendar::config)
            .configure(controllers::notes::config)
            .configure(controllers::gantt::config)
            .configure(controllers::contacts::config)
            .configure(controllers::dashboard::config);

        // Registered last so the API routes take precedence
        if let Some(dir) = &dashboard_dir {
            app = app.service(Files::new("/", dir.clone()).index_file("index.html"));
        }

        app
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
