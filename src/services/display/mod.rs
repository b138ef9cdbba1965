//! The public display surface: `/` and `/r/{route_name}`. No
//! authentication; unknown names fall back to the configured default route
//! so a signage screen always resolves to something.

pub(crate) mod view;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(view::index))
        .route("/r/{route_name}", web::get().to(view::process));
}
