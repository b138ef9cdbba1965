use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;

use crate::config::Config;
use crate::db;
use crate::model::item::Item;
use crate::services::{auth, render_page};

#[derive(Template)]
#[template(path = "items.html")]
struct ItemsPage {
    items: Vec<Item>,
}

/// `GET /admin/items`: every item, unfiltered and unpaginated.
pub(crate) async fn process(session: Session, config: web::Data<Config>) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match load_items(&config.database_path) {
        Ok(items) => render_page(&ItemsPage { items }),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error listing items: {}", e)),
    }
}

pub(crate) fn load_items(database_path: &str) -> Result<Vec<Item>, String> {
    let conn = db::open(database_path).map_err(|e| e.to_string())?;
    let mut stmt = conn
        .prepare("SELECT id, label, qr_text, image_path FROM items")
        .map_err(|e| e.to_string())?;
    let items = stmt
        .query_map([], |row| Item::from_row(row))
        .map_err(|e| e.to_string())?
        .filter_map(Result::ok)
        .collect();
    Ok(items)
}
