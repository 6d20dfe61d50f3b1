use std::env;
use std::path::PathBuf;

use strum::EnumString;

/// Path the funnel resource is served under.
pub const API_PATH: &str = "/api/purchases";

/// Server-side record store backing the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StoreKind {
    /// Process-local lists, lost on restart
    Memory,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub database_path: String,
    /// Endpoint client commands talk to
    pub api_base: String,
    /// Local fallback store file (None = platform data directory)
    pub data_file: Option<PathBuf>,
    /// Client commands skip the API entirely
    pub offline: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let store = env::var("FUNNEL_STORE")
            .ok()
            .and_then(|v| v.to_lowercase().parse().ok())
            .unwrap_or(StoreKind::Memory);

        let api_base = env::var("FUNNEL_API_BASE")
            .unwrap_or_else(|_| format!("http://{}:{}{}", host, port, API_PATH));

        let offline = env::var("FUNNEL_OFFLINE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            host,
            port,
            store,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "funnel.db".to_string()),
            api_base,
            data_file: env::var("FUNNEL_DATA_FILE").ok().map(PathBuf::from),
            offline,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
