use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use futures_util::StreamExt;
use rusqlite::params;
use std::path::Path;

use crate::config::Config;
use crate::db;
use crate::services::{auth, multipart, redirect_to};

/// `POST /admin/items`: creates an item from a multipart form.
pub(crate) async fn process(
    session: Session,
    config: web::Data<Config>,
    payload: Multipart,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match create_item(&config, payload).await {
        Ok(()) => redirect_to("/admin/items"),
        Err(e) => HttpResponse::BadRequest().body(format!("Error creating item: {}", e)),
    }
}

/// Reads the `label`, `qr_text` and `image` parts, stores the icon under
/// the media directory keeping its original filename (an identical name
/// overwrites the previous upload) and inserts the row.
async fn create_item(
    config: &Config,
    mut payload: Multipart,
) -> Result<(), Box<dyn std::error::Error>> {
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
    let image_path = image_path.ok_or("Missing image upload")?;

    let conn = db::open(&config.database_path)?;
    conn.execute(
        "INSERT INTO items (label, qr_text, image_path) VALUES (?1, ?2, ?3)",
        params![label, qr_text, image_path],
    )?;
    Ok(())
}
