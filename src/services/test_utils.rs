//! Shared fixtures for the service tests.

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use rusqlite::{params, Connection};
use tempfile::TempDir;

use crate::config::Config;

pub(crate) fn test_config(dir: &TempDir) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: dir.path().join("signboard.sqlite").to_string_lossy().into_owned(),
        media_dir: dir.path().join("media").to_string_lossy().into_owned(),
        default_route: "menu1".to_string(),
        inactivity_timeout_ms: 60_000,
        session_secret: None,
    }
}

/// Cookie session middleware with a throwaway key. `cookie_secure` is off
/// so the plain-http test client can send the cookie back.
pub(crate) fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("auth".to_string())
        .cookie_secure(false)
        .build()
}

pub(crate) fn insert_item(conn: &Connection, label: &str) -> i64 {
    conn.execute(
        "INSERT INTO items (label, qr_text, image_path) VALUES (?1, ?2, ?3)",
        params![
            label,
            format!("https://example.test/{}", label),
            format!("/media/icons/{}.png", label)
        ],
    )
    .expect("insert item");
    conn.last_insert_rowid()
}

pub(crate) fn insert_route(conn: &Connection, route: &str) -> i64 {
    conn.execute(
        "INSERT INTO route_sets (route, title, rows, cols, timeout, background_path)
         VALUES (?1, ?2, 2, 3, 30000, NULL)",
        params![route, format!("{} board", route)],
    )
    .expect("insert route");
    conn.last_insert_rowid()
}
