//! Admin authentication: the login/logout endpoints and the session guard
//! every `/admin` handler runs first.
//!
//! The session is a signed, expiring cookie carrying the admin's user id.
//! The guard never answers 401 for a missing session; admin pages redirect
//! to the login form instead.

pub(crate) mod login;
pub(crate) mod logout;

use actix_session::Session;
use actix_web::{web, HttpResponse};

/// Session key holding the authenticated admin's user id.
pub(crate) const USER_ID_KEY: &str = "user_id";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login::form))
            .route(web::post().to(login::process)),
    )
    .route("/logout", web::get().to(logout::process));
}

/// The authenticated user id, when the session carries a valid one.
pub(crate) fn authenticated_user(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID_KEY).ok().flatten()
}

/// Admin gate shared by every `/admin` handler. `None` means proceed;
/// otherwise the caller returns the redirect to the login page.
pub(crate) fn guard(session: &Session) -> Option<HttpResponse> {
    if authenticated_user(session).is_some() {
        None
    } else {
        Some(super::redirect_to("/login"))
    }
}
