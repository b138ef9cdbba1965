use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use rusqlite::params;

use crate::config::Config;
use crate::db;
use crate::model::item::Item;
use crate::model::route_set::RouteSet;
use crate::services::{redirect_to, render_page};

#[derive(Template)]
#[template(path = "view_route.html")]
struct RoutePage {
    route: RouteSet,
    items: Vec<Item>,
    /// Global idle timeout; the per-route stored value is not rendered.
    inactivity_timeout_ms: u64,
}

/// `GET /`: always lands on the default route.
pub(crate) async fn index(config: web::Data<Config>) -> impl Responder {
    redirect_to(&format!("/r/{}", config.default_route))
}

/// `GET /r/{route_name}`: renders the route's grid. Unknown names redirect
/// to the default route; a missing default itself answers 404 so two
/// misconfigured lookups can never chase each other in a redirect loop.
pub(crate) async fn process(
    config: web::Data<Config>,
    route_name: web::Path<String>,
) -> impl Responder {
    match load_route(&config.database_path, &route_name) {
        Ok(Some((route, items))) => render_page(&RoutePage {
            route,
            items,
            inactivity_timeout_ms: config.inactivity_timeout_ms,
        }),
        Ok(None) if route_name.as_str() == config.default_route => HttpResponse::NotFound()
            .body("Default route is not configured; create it in the admin panel"),
        Ok(None) => redirect_to(&format!("/r/{}", config.default_route)),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error loading route: {}", e)),
    }
}

/// Loads the route by its public key together with its items in position
/// order.
fn load_route(database_path: &str, route_name: &str) -> Result<Option<(RouteSet, Vec<Item>)>, String> {
    let conn = db::open(database_path).map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT id, route, title, rows, cols, timeout, background_path
             FROM route_sets WHERE route = ?1",
        )
        .map_err(|e| e.to_string())?;
    let route = match stmt.query_row(params![route_name], |row| RouteSet::from_row(row)) {
        Ok(route) => route,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };

    let mut item_stmt = conn
        .prepare(
            "SELECT items.id, items.label, items.qr_text, items.image_path
             FROM route_items
             JOIN items ON items.id = route_items.item_id
             WHERE route_items.route_id = ?1
             ORDER BY route_items.position",
        )
        .map_err(|e| e.to_string())?;
    let items = item_stmt
        .query_map(params![route.id], |row| Item::from_row(row))
        .map_err(|e| e.to_string())?
        .filter_map(Result::ok)
        .collect();

    Ok(Some((route, items)))
}
