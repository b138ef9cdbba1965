//! # Route registry and assignment
//!
//! Endpoints under `/admin/routes` for managing named display routes and
//! the ordered set of items each one shows.
//!
//! ## Registered routes
//!
//! *   **`GET ""`** — `list::process`: all routes with the creation form.
//! *   **`POST ""`** — `create::process`: multipart `route`, `title`,
//!     `rows`, `cols`, `timeout` plus an optional `background` upload. A
//!     duplicate route key answers 409 instead of overwriting.
//! *   **`GET /{route_id}/edit`** — `edit::form`: 404 when the id is
//!     unknown.
//! *   **`POST /{route_id}/edit`** — `edit::submit`: overwrites the scalar
//!     fields; the background only changes when a new file was sent.
//! *   **`GET /{route_id}/assign`** — `assign::form`: assigned items and
//!     the remaining pool.
//! *   **`POST /{route_id}/assign`** — `assign::submit`: replaces the
//!     route's whole ordering from a comma-separated id list.
//!
//! Routes are never deleted.

pub(crate) mod assign;
pub(crate) mod create;
pub(crate) mod edit;
pub(crate) mod list;

use actix_multipart::Multipart;
use actix_web::web::{get, post, resource, scope};
use actix_web::Scope;
use futures_util::StreamExt;
use std::path::Path;

use crate::config::Config;
use crate::services::multipart;

const API_PATH: &str = "/admin/routes";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .service(
            resource("")
                .route(get().to(list::process))
                .route(post().to(create::process)),
        )
        .service(
            resource("/{route_id}/edit")
                .route(get().to(edit::form))
                .route(post().to(edit::submit)),
        )
        .service(
            resource("/{route_id}/assign")
                .route(get().to(assign::form))
                .route(post().to(assign::submit)),
        )
}

/// Scalar fields shared by the route create and edit forms.
pub(crate) struct RouteForm {
    pub route: String,
    pub title: String,
    pub rows: u32,
    pub cols: u32,
    pub timeout: u32,
    /// Public path of a background uploaded with this submission, when the
    /// form carried one.
    pub background_path: Option<String>,
}

/// Reads the multipart route form. A `background` part with a filename is
/// stored under the media directory; an empty file input leaves
/// `background_path` as `None`.
pub(crate) async fn collect_form(
    config: &Config,
    mut payload: Multipart,
) -> Result<RouteForm, String> {
    let mut route = None;
    let mut title = None;
    let mut rows = None;
    let mut cols = None;
    let mut timeout = None;
    let mut background_path = None;

    let backgrounds_dir = Path::new(&config.media_dir).join("backgrounds");
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| e.to_string())?;
        match multipart::field_name(&field).as_deref() {
            Some("route") => route = Some(read_text(&mut field).await?),
            Some("title") => title = Some(read_text(&mut field).await?),
            Some("rows") => rows = Some(read_text(&mut field).await?),
            Some("cols") => cols = Some(read_text(&mut field).await?),
            Some("timeout") => timeout = Some(read_text(&mut field).await?),
            Some("background") => {
                if let Some(name) = multipart::filename(&field) {
                    multipart::save_file(&mut field, &backgrounds_dir, &name)
                        .await
                        .map_err(|e| e.to_string())?;
                    background_path = Some(format!("/media/backgrounds/{}", name));
                }
            }
            _ => {}
        }
    }

    Ok(RouteForm {
        route: route.ok_or_else(|| "Missing route".to_string())?,
        title: title.ok_or_else(|| "Missing title".to_string())?,
        rows: parse_number("rows", rows)?,
        cols: parse_number("cols", cols)?,
        timeout: parse_number("timeout", timeout)?,
        background_path,
    })
}

async fn read_text(field: &mut actix_multipart::Field) -> Result<String, String> {
    multipart::read_text(field).await.map_err(|e| e.to_string())
}

fn parse_number(name: &str, value: Option<String>) -> Result<u32, String> {
    value
        .ok_or_else(|| format!("Missing {}", name))?
        .trim()
        .parse()
        .map_err(|e| format!("Invalid {}: {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::parse_number;

    #[test]
    fn parse_number_reports_missing_and_malformed_fields() {
        assert_eq!(parse_number("rows", Some(" 4 ".to_string())), Ok(4));
        assert!(parse_number("rows", None)
            .unwrap_err()
            .contains("Missing rows"));
        assert!(parse_number("rows", Some("four".to_string()))
            .unwrap_err()
            .contains("Invalid rows"));
    }
}
