//! The admin dashboard shell at `/admin`. Item and route management live
//! in their own scopes under `/admin/items` and `/admin/routes`.

pub(crate) mod dashboard;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/admin";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(dashboard::process))
}
