use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;

use crate::config::Config;
use crate::db;
use crate::model::route_set::RouteSet;
use crate::services::{auth, render_page};

#[derive(Template)]
#[template(path = "routes.html")]
struct RoutesPage {
    routes: Vec<RouteSet>,
}

/// `GET /admin/routes`: every route with the creation form.
pub(crate) async fn process(session: Session, config: web::Data<Config>) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match load_routes(&config.database_path) {
        Ok(routes) => render_page(&RoutesPage { routes }),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error listing routes: {}", e)),
    }
}

pub(crate) fn load_routes(database_path: &str) -> Result<Vec<RouteSet>, String> {
    let conn = db::open(database_path).map_err(|e| e.to_string())?;
    let mut stmt = conn
        .prepare(
            "SELECT id, route, title, rows, cols, timeout, background_path FROM route_sets",
        )
        .map_err(|e| e.to_string())?;
    let routes = stmt
        .query_map([], |row| RouteSet::from_row(row))
        .map_err(|e| e.to_string())?
        .filter_map(Result::ok)
        .collect();
    Ok(routes)
}
