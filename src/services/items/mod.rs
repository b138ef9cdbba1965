//! # Item registry
//!
//! CRUD endpoints for display items under `/admin/items`. Every handler
//! runs the session guard first and redirects to `/login` when no admin
//! session is present.
//!
//! ## Registered routes
//!
//! *   **`GET ""`** — `list::process`: all items, unfiltered, with the
//!     creation form.
//! *   **`POST ""`** — `create::process`: multipart `label`, `qr_text` and
//!     a required `image` upload; the icon lands under `media/icons/` and
//!     keeps its original filename.
//! *   **`GET /{item_id}/edit`** — `edit::form`: loads the item into the
//!     edit form, 404 when the id is unknown.
//! *   **`POST /{item_id}/edit`** — `edit::submit`: overwrites label and
//!     QR text; the icon only changes when a new file was sent.
//! *   **`POST /{item_id}/delete`** — `delete::process`: removes the item
//!     together with every route slot referencing it.

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod edit;
pub(crate) mod list;

use actix_web::web::{get, post, resource, scope};
use actix_web::Scope;

const API_PATH: &str = "/admin/items";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .service(
            resource("")
                .route(get().to(list::process))
                .route(post().to(create::process)),
        )
        .service(
            resource("/{item_id}/edit")
                .route(get().to(edit::form))
                .route(post().to(edit::submit)),
        )
        .route("/{item_id}/delete", post().to(delete::process))
}
