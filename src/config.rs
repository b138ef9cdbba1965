//! Process configuration, read once at startup and handed to the handlers
//! through `web::Data` instead of being consulted from global scope.

use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite file holding all four tables.
    pub database_path: String,
    /// Directory for uploaded media, served under `/media`.
    pub media_dir: String,
    /// Route key the public surface falls back to.
    pub default_route: String,
    /// Idle time in milliseconds before a display returns to the default
    /// route.
    pub inactivity_timeout_ms: u64,
    /// Secret the session cookies are signed with. When unset or too short
    /// an ephemeral key is generated at startup.
    pub session_secret: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            host: try_load("SIGNBOARD_HOST", "127.0.0.1"),
            port: try_load("SIGNBOARD_PORT", "8080"),
            database_path: try_load("SIGNBOARD_DB", "signboard.sqlite"),
            media_dir: try_load("SIGNBOARD_MEDIA", "media"),
            default_route: try_load("DEFAULT_ROUTE", "menu1"),
            inactivity_timeout_ms: try_load("INACTIVITY_TIMEOUT", "60000"),
            session_secret: env::var("SESSION_SECRET").ok(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {} not found, using default", key);
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e| {
            warn!("Invalid {} value: {}", key, e);
        })
        .expect("Environment misconfigured!")
}
