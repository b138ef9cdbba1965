use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use rusqlite::{params, Connection};

use crate::config::Config;
use crate::db;
use crate::services::{auth, redirect_to};

use super::{collect_form, RouteForm};

/// Failures the create/edit handlers must tell apart: a duplicate route
/// key answers 409, everything else 400.
#[derive(Debug)]
pub(crate) enum RouteWriteError {
    DuplicateKey,
    Other(String),
}

pub(crate) fn write_error(e: rusqlite::Error) -> RouteWriteError {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            RouteWriteError::DuplicateKey
        }
        other => RouteWriteError::Other(other.to_string()),
    }
}

/// `POST /admin/routes`: creates a route from the multipart form.
pub(crate) async fn process(
    session: Session,
    config: web::Data<Config>,
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
    match insert_route(&conn, &form) {
        Ok(()) => redirect_to("/admin/routes"),
        Err(RouteWriteError::DuplicateKey) => HttpResponse::Conflict()
            .body(format!("Route key '{}' already exists", form.route)),
        Err(RouteWriteError::Other(e)) => {
            HttpResponse::BadRequest().body(format!("Error creating route: {}", e))
        }
    }
}

pub(crate) fn insert_route(conn: &Connection, form: &RouteForm) -> Result<(), RouteWriteError> {
    conn.execute(
        "INSERT INTO route_sets (route, title, rows, cols, timeout, background_path)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            form.route,
            form.title,
            form.rows,
            form.cols,
            form.timeout,
            form.background_path
        ],
    )
    .map_err(write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils;
    use tempfile::TempDir;

    fn sample_form(route: &str) -> RouteForm {
        RouteForm {
            route: route.to_string(),
            title: "Lunch specials".to_string(),
            rows: 2,
            cols: 3,
            timeout: 30_000,
            background_path: None,
        }
    }

    #[test]
    fn duplicate_route_key_is_rejected_not_overwritten() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        insert_route(&conn, &sample_form("lunch")).expect("first insert");

        let mut second = sample_form("lunch");
        second.title = "Overwrite attempt".to_string();
        assert!(matches!(
            insert_route(&conn, &second),
            Err(RouteWriteError::DuplicateKey)
        ));

        // The original row survives untouched.
        let title: String = conn
            .query_row(
                "SELECT title FROM route_sets WHERE route = 'lunch'",
                [],
                |row| row.get(0),
            )
            .expect("fetch");
        assert_eq!(title, "Lunch specials");
    }
}
