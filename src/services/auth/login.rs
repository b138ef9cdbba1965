use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use rusqlite::params;
use serde::Deserialize;

use crate::config::Config;
use crate::db;
use crate::model::user::User;
use crate::services::{redirect_to, render_page};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage;

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

/// `GET /login`: shows the sign-in form.
pub(crate) async fn form() -> impl Responder {
    render_page(&LoginPage)
}

/// `POST /login`: verifies the credentials, stores the user id in the
/// signed session and redirects to the dashboard. Any failure answers 401
/// with an inline retry link and sets no cookie.
pub(crate) async fn process(
    session: Session,
    config: web::Data<Config>,
    payload: web::Form<LoginForm>,
) -> impl Responder {
    match verify_credentials(&config, &payload.username, &payload.password) {
        Ok(Some(user)) => {
            if session.insert(super::USER_ID_KEY, user.id).is_err() {
                return HttpResponse::InternalServerError().body("Failed to establish session");
            }
            session.renew();
            redirect_to("/admin")
        }
        Ok(None) => HttpResponse::Unauthorized()
            .content_type("text/html; charset=utf-8")
            .body("<h3>Invalid credentials</h3><a href='/login'>Try again</a>"),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error processing login: {}", e))
        }
    }
}

/// Looks up the user by exact, case-sensitive username and checks the
/// password against the stored bcrypt hash. `Ok(None)` covers both unknown
/// users and wrong passwords so the caller cannot tell them apart.
fn verify_credentials(
    config: &Config,
    username: &str,
    password: &str,
) -> Result<Option<User>, String> {
    let conn = db::open(&config.database_path).map_err(|e| e.to_string())?;
    let mut stmt = conn
        .prepare("SELECT id, username, hashed_password FROM users WHERE username = ?1")
        .map_err(|e| e.to_string())?;

    let user = match stmt.query_row(params![username], |row| User::from_row(row)) {
        Ok(user) => user,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };

    match bcrypt::verify(password, &user.hashed_password) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}
