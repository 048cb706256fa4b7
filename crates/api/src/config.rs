/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite connection URL (default: `sqlite://taskboard.db?mode=rwc`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the overdue-task sweep is armed at startup (default: `true`).
    pub overdue_job_enabled: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `3000`                           |
    /// | `DATABASE_URL`         | `sqlite://taskboard.db?mode=rwc` |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `OVERDUE_JOB_ENABLED`  | `true`                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://taskboard.db?mode=rwc".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let overdue_job_enabled: bool = std::env::var("OVERDUE_JOB_ENABLED")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("OVERDUE_JOB_ENABLED must be true or false");

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            overdue_job_enabled,
        }
    }
}
