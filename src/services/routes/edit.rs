use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use rusqlite::{params, Connection};

use crate::config::Config;
use crate::db;
use crate::model::route_set::RouteSet;
use crate::services::{auth, redirect_to, render_page};

use super::create::{write_error, RouteWriteError};
use super::{collect_form, RouteForm};

#[derive(Template)]
#[template(path = "route_edit.html")]
struct RouteEditPage {
    route: RouteSet,
}

/// `GET /admin/routes/{route_id}/edit`: loads the route into the edit
/// form; unknown ids answer an explicit 404, not a redirect.
pub(crate) async fn form(
    session: Session,
    config: web::Data<Config>,
    route_id: web::Path<i64>,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match load_route(&config.database_path, *route_id) {
        Ok(Some(route)) => render_page(&RouteEditPage { route }),
        Ok(None) => HttpResponse::NotFound().body("Route not found"),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error loading route: {}", e)),
    }
}

/// `POST /admin/routes/{route_id}/edit`: overwrites the scalar fields; the
/// background only changes when the form carried a new file.
pub(crate) async fn submit(
    session: Session,
    config: web::Data<Config>,
    route_id: web::Path<i64>,
    payload: Multipart,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    let form = match collect_form(&config, payload).await {
        Ok(form) => form,
        Err(e) => return HttpResponse::BadRequest().body(format!("Error reading route form: {}", e)),
    };
    let conn = match db::open(&config.database_path) {
        Ok(conn) => conn,
        Err(e) => {
            return HttpResponse::ServiceUnavailable().body(format!("Error opening store: {}", e))
        }
    };
    match update_route(&conn, *route_id, &form) {
        Ok(true) => redirect_to("/admin/routes"),
        Ok(false) => HttpResponse::NotFound().body("Route not found"),
        Err(RouteWriteError::DuplicateKey) => HttpResponse::Conflict()
            .body(format!("Route key '{}' already exists", form.route)),
        Err(RouteWriteError::Other(e)) => {
            HttpResponse::BadRequest().body(format!("Error updating route: {}", e))
        }
    }
}

pub(crate) fn load_route(database_path: &str, route_id: i64) -> Result<Option<RouteSet>, String> {
    let conn = db::open(database_path).map_err(|e| e.to_string())?;
    let mut stmt = conn
        .prepare(
            "SELECT id, route, title, rows, cols, timeout, background_path
             FROM route_sets WHERE id = ?1",
        )
        .map_err(|e| e.to_string())?;
    match stmt.query_row(params![route_id], |row| RouteSet::from_row(row)) {
        Ok(route) => Ok(Some(route)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

/// Returns `Ok(false)` when no row matched the id.
pub(crate) fn update_route(
    conn: &Connection,
    route_id: i64,
    form: &RouteForm,
) -> Result<bool, RouteWriteError> {
    let changed = match &form.background_path {
        Some(background_path) => conn
            .execute(
                "UPDATE route_sets
                 SET route = ?1, title = ?2, rows = ?3, cols = ?4, timeout = ?5,
                     background_path = ?6
                 WHERE id = ?7",
                params![
                    form.route,
                    form.title,
                    form.rows,
                    form.cols,
                    form.timeout,
                    background_path,
                    route_id
                ],
            )
            .map_err(write_error)?,
        None => conn
            .execute(
                "UPDATE route_sets
                 SET route = ?1, title = ?2, rows = ?3, cols = ?4, timeout = ?5
                 WHERE id = ?6",
                params![
                    form.route,
                    form.title,
                    form.rows,
                    form.cols,
                    form.timeout,
                    route_id
                ],
            )
            .map_err(write_error)?,
    };
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils;
    use tempfile::TempDir;

    #[test]
    fn update_preserves_background_unless_resubmitted() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        conn.execute(
            "INSERT INTO route_sets (route, title, rows, cols, timeout, background_path)
             VALUES ('lunch', 'Lunch', 2, 2, 30000, '/media/backgrounds/wood.jpg')",
            [],
        )
        .expect("insert");
        let route_id = conn.last_insert_rowid();

        let form = RouteForm {
            route: "lunch".to_string(),
            title: "Lunch v2".to_string(),
            rows: 3,
            cols: 4,
            timeout: 45_000,
            background_path: None,
        };
        assert!(update_route(&conn, route_id, &form).expect("update"));

        let updated = load_route(&config.database_path, route_id)
            .expect("load")
            .expect("present");
        assert_eq!(updated.title, "Lunch v2");
        assert_eq!(updated.rows, 3);
        assert_eq!(
            updated.background_path.as_deref(),
            Some("/media/backgrounds/wood.jpg")
        );
    }

    #[test]
    fn update_of_unknown_id_reports_missing() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let form = RouteForm {
            route: "ghost".to_string(),
            title: "Ghost".to_string(),
            rows: 1,
            cols: 1,
            timeout: 1000,
            background_path: None,
        };
        assert!(!update_route(&conn, 42, &form).expect("update"));
    }
}
