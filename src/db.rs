//! SQLite schema management and connection helpers.
//!
//! Every operation opens its own short-lived connection through [`open`];
//! nothing holds one across requests. [`init`] runs once at startup to
//! create the tables and seed the single admin account.

use bcrypt::{hash, DEFAULT_COST};
use log::info;
use rusqlite::{params, Connection};

use crate::config::Config;

pub(crate) fn open(path: &str) -> Result<Connection, rusqlite::Error> {
    Connection::open(path)
}

/// Creates the four tables when missing and seeds `admin`/`admin` on first
/// launch. Safe to run on every startup.
///
/// The foreign key clauses on `route_items` are documentary: SQLite leaves
/// enforcement off by default and the handlers delete association rows
/// explicitly before their targets.
pub(crate) fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open(&config.database_path)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            hashed_password TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY,
            label TEXT NOT NULL,
            qr_text TEXT NOT NULL,
            image_path TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS route_sets (
            id INTEGER PRIMARY KEY,
            route TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            rows INTEGER NOT NULL,
            cols INTEGER NOT NULL,
            timeout INTEGER NOT NULL,
            background_path TEXT
        );
        CREATE TABLE IF NOT EXISTS route_items (
            id INTEGER PRIMARY KEY,
            route_id INTEGER NOT NULL REFERENCES route_sets(id),
            item_id INTEGER NOT NULL REFERENCES items(id),
            position INTEGER NOT NULL
        );",
    )?;

    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1",
        params!["admin"],
        |row| row.get(0),
    )?;
    if existing == 0 {
        let hashed = hash("admin", DEFAULT_COST)?;
        conn.execute(
            "INSERT INTO users (username, hashed_password) VALUES (?1, ?2)",
            params!["admin", hashed],
        )?;
        info!("Seeded default admin account");
    }

    Ok(())
}
