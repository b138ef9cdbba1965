mod config;
mod db;
mod model;
mod services;

use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::cookie::Key;
use actix_web::{web, App, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{info, warn};
use mime_guess::from_path;
use std::fs;
use std::io;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static");

/// How long a signed admin session stays valid before the cookie expires.
const SESSION_TTL_HOURS: i64 = 12;

async fn serve_static(path: web::Path<String>) -> HttpResponse {
    match STATIC_DIR.get_file(path.as_str()) {
        Some(file) => {
            let mime = from_path(path.as_str()).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => HttpResponse::NotFound().body("Not Found"),
    }
}

fn session_key(config: &config::Config) -> Key {
    match config.session_secret.as_deref() {
        Some(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
        Some(_) => {
            warn!("SESSION_SECRET is shorter than 64 bytes, using an ephemeral key");
            Key::generate()
        }
        None => {
            warn!("SESSION_SECRET not set, sessions will not survive a restart");
            Key::generate()
        }
    }
}

/// Signed cookie session carrying the admin's user id. The panel serves
/// plain HTTP on a trusted network, so the cookie is HTTP-only and signed
/// but not marked Secure.
fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("auth".to_string())
        .cookie_http_only(true)
        .cookie_secure(false)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)))
        .build()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = config::Config::load();

    db::init(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    fs::create_dir_all(format!("{}/icons", config.media_dir))?;
    fs::create_dir_all(format!("{}/backgrounds", config.media_dir))?;

    let key = session_key(&config);
    let media_dir = config.media_dir.clone();
    let host = config.host.clone();
    let port = config.port;

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .wrap(session_middleware(key.clone()))
            .service(services::items::configure_routes())
            .service(services::routes::configure_routes())
            .service(services::admin::configure_routes())
            .configure(services::auth::configure)
            .configure(services::display::configure)
            .service(actix_files::Files::new("/media", media_dir.clone()))
            .route("/static/{path:.*}", web::get().to(serve_static))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
