//! HTTP service modules, one per feature area.
//!
//! Each admin area exposes `configure_routes() -> Scope` grouping its
//! endpoints under a common path prefix; the prefix-less surfaces (login,
//! logout, the public display) register plain routes through `configure`.

pub mod admin;
pub mod auth;
pub mod display;
pub mod items;
mod multipart;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_utils;

use actix_web::http::header;
use actix_web::HttpResponse;
use askama::Template;

/// 302 redirect used by the form handlers and the auth guard.
pub(crate) fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Renders an askama page into an HTML response.
pub(crate) fn render_page<T: Template>(page: &T) -> HttpResponse {
    match page.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => HttpResponse::InternalServerError().body(format!("Template error: {}", e)),
    }
}
