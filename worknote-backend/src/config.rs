use std::env;
use std::path::{Path, PathBuf};

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Directory that receives the Obsidian-compatible markdown notes.
    pub const NOTES_DIR: &str = "NOTES_DIR";
    /// Optional directory with prebuilt dashboard assets (index.html etc).
    /// Nothing is served at `/` when unset or missing.
    pub const DASHBOARD_DIR: &str = "DASHBOARD_DIR";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8000;
    pub const DATABASE_URL: &str = "./.db/worknote.db";
    pub const NOTES_DIR: &str = "notes";
    pub const SERVER_NAME: &str = "Worknote Server";
}

/// Returns the absolute path to the worknote-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it always resolves
/// to worknote-backend/ regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Get the notes directory (NOTES_DIR, or worknote-backend/notes)
pub fn notes_dir() -> String {
    match env::var(env_vars::NOTES_DIR) {
        Ok(dir) if !dir.trim().is_empty() => dir,
        _ => backend_dir().join(defaults::NOTES_DIR).to_string_lossy().to_string(),
    }
}

/// Get the dashboard asset directory, if configured and present on disk
pub fn dashboard_dir() -> Option<String> {
    env::var(env_vars::DASHBOARD_DIR)
        .ok()
        .filter(|dir| Path::new(dir).join("index.html").exists())
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match env::var(env_vars::PORT) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("PORT={} is not a valid port, using {}", raw, defaults::PORT);
                defaults::PORT
            }),
            Err(_) => defaults::PORT,
        };

        Self {
            host: env::var(env_vars::HOST).unwrap_or_else(|_| defaults::HOST.to_string()),
            port,
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
        }
    }
}

/// Configuration for the notes sink (Obsidian-compatible markdown notes with FTS5)
#[derive(Clone, Debug)]
pub struct NotesConfig {
    /// Directory for notes markdown files
    pub notes_dir: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            notes_dir: notes_dir(),
        }
    }
}

impl NotesConfig {
    /// Get the path to the notes FTS database
    pub fn notes_db_path(&self) -> String {
        format!("{}/.notes.db", self.notes_dir)
    }
}

/// Get the notes configuration
pub fn notes_config() -> NotesConfig {
    NotesConfig::default()
}

/// Create the database parent directory and the notes directory.
/// Called once at startup before the first request is served.
pub fn initialize_directories(config: &Config, notes: &NotesConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(&config.database_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::create_dir_all(&notes.notes_dir)?;
    log::info!("Notes directory: {}", notes.notes_dir);

    Ok(())
}
