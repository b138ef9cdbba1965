use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use futures_util::StreamExt;
use rusqlite::params;
use std::path::Path;

use crate::config::Config;
use crate::db;
use crate::model::item::Item;
use crate::services::{auth, multipart, redirect_to, render_page};

#[derive(Template)]
#[template(path = "item_edit.html")]
struct ItemEditPage {
    item: Item,
}

/// `GET /admin/items/{item_id}/edit`: loads the item into the edit form.
pub(crate) async fn form(
    session: Session,
    config: web::Data<Config>,
    item_id: web::Path<i64>,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match load_item(&config.database_path, *item_id) {
        Ok(Some(item)) => render_page(&ItemEditPage { item }),
        Ok(None) => HttpResponse::NotFound().body("Item not found"),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error loading item: {}", e)),
    }
}

/// `POST /admin/items/{item_id}/edit`: overwrites label and QR text; the
/// stored icon only changes when a new non-empty file part arrived.
pub(crate) async fn submit(
    session: Session,
    config: web::Data<Config>,
    item_id: web::Path<i64>,
    payload: Multipart,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match update_item(&config, *item_id, payload).await {
        Ok(true) => redirect_to("/admin/items"),
        Ok(false) => HttpResponse::NotFound().body("Item not found"),
        Err(e) => HttpResponse::BadRequest().body(format!("Error updating item: {}", e)),
    }
}

pub(crate) fn load_item(database_path: &str, item_id: i64) -> Result<Option<Item>, String> {
    let conn = db::open(database_path).map_err(|e| e.to_string())?;
    let mut stmt = conn
        .prepare("SELECT id, label, qr_text, image_path FROM items WHERE id = ?1")
        .map_err(|e| e.to_string())?;
    match stmt.query_row(params![item_id], |row| Item::from_row(row)) {
        Ok(item) => Ok(Some(item)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

/// Returns `Ok(false)` when no row matched the id.
async fn update_item(
    config: &Config,
    item_id: i64,
    mut payload: Multipart,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut label = None;
    let mut qr_text = None;
    let mut image_path = None;

    let icons_dir = Path::new(&config.media_dir).join("icons");
    while let Some(item) = payload.next().await {
        let mut field = item?;
        match multipart::field_name(&field).as_deref() {
            Some("label") => label = Some(multipart::read_text(&mut field).await?),
            Some("qr_text") => qr_text = Some(multipart::read_text(&mut field).await?),
            Some("image") => {
                if let Some(name) = multipart::filename(&field) {
                    multipart::save_file(&mut field, &icons_dir, &name).await?;
                    image_path = Some(format!("/media/icons/{}", name));
                }
            }
            _ => {}
        }
    }

    let label = label.ok_or("Missing label")?;
    let qr_text = qr_text.ok_or("Missing qr_text")?;

    let conn = db::open(&config.database_path)?;
    let changed = match image_path {
        Some(image_path) => conn.execute(
            "UPDATE items SET label = ?1, qr_text = ?2, image_path = ?3 WHERE id = ?4",
            params![label, qr_text, image_path, item_id],
        )?,
        None => conn.execute(
            "UPDATE items SET label = ?1, qr_text = ?2 WHERE id = ?3",
            params![label, qr_text, item_id],
        )?,
    };
    Ok(changed > 0)
}
