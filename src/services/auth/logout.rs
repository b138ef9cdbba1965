use actix_session::Session;
use actix_web::Responder;

use crate::services::redirect_to;

/// `GET /logout`: drops the session cookie and returns to the public view.
pub(crate) async fn process(session: Session) -> impl Responder {
    session.purge();
    redirect_to("/")
}
