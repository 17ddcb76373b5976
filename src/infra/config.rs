//! Centralized configuration (environment variables + defaults).

use crate::domain::form::FormRegistry;
use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://pilot_training_portal.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database URL, defaults to a SQLite file in the working directory.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

pub fn bind_addr() -> anyhow::Result<SocketAddr> {
    let v = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    v.parse::<SocketAddr>()
        .with_context(|| format!("BIND_ADDR must be a socket address, got '{}'", v))
}

/// Pool size (at least 1).
pub fn db_max_connections() -> anyhow::Result<u32> {
    match std::env::var("DB_MAX_CONNECTIONS") {
        Ok(v) => Ok(v
            .parse::<u32>()
            .with_context(|| format!("DB_MAX_CONNECTIONS must be a valid u32, got '{}'", v))?
            .max(1)),
        Err(_) => Ok(DEFAULT_MAX_CONNECTIONS),
    }
}

/// Optional JSON file replacing the built-in form catalog.
pub fn forms_config_path() -> Option<PathBuf> {
    std::env::var("FORMS_CONFIG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub forms_config: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self {
            database_url: database_url(),
            bind_addr: bind_addr()?,
            max_connections: db_max_connections()?,
            forms_config: forms_config_path(),
        })
    }

    /// Builds the form registry from `FORMS_CONFIG`, or the built-in catalog.
    pub fn load_registry(&self) -> anyhow::Result<FormRegistry> {
        let registry = match &self.forms_config {
            Some(path) => FormRegistry::load_from_file(path)
                .with_context(|| format!("loading forms from {}", path.display()))?,
            None => FormRegistry::builtin().context("built-in form catalog")?,
        };
        tracing::info!(forms = registry.len(), "form registry loaded");
        Ok(registry)
    }
}
