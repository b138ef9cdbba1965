use actix_session::Session;
use actix_web::Responder;
use askama::Template;

use crate::services::{auth, render_page};

#[derive(Template)]
#[template(path = "admin.html")]
struct DashboardPage;

/// `GET /admin`: the dashboard shell linking to the item and route screens.
pub(crate) async fn process(session: Session) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    render_page(&DashboardPage)
}
