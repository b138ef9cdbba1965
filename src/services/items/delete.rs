use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use rusqlite::params;

use crate::config::Config;
use crate::db;
use crate::services::{auth, redirect_to};

/// `POST /admin/items/{item_id}/delete`: removes the item and every route
/// slot referencing it.
pub(crate) async fn process(
    session: Session,
    config: web::Data<Config>,
    item_id: web::Path<i64>,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match delete_item(&config.database_path, *item_id) {
        Ok(()) => redirect_to("/admin/items"),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error deleting item: {}", e)),
    }
}

/// Deletes the association rows first, then the item, in one transaction;
/// the store does not cascade, so the order matters.
pub(crate) fn delete_item(database_path: &str, item_id: i64) -> Result<(), String> {
    let mut conn = db::open(database_path).map_err(|e| e.to_string())?;
    let tx = conn.transaction().map_err(|e| e.to_string())?;
    tx.execute("DELETE FROM route_items WHERE item_id = ?1", params![item_id])
        .map_err(|e| e.to_string())?;
    tx.execute("DELETE FROM items WHERE id = ?1", params![item_id])
        .map_err(|e| e.to_string())?;
    tx.commit().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::routes::assign::replace_assignments;
    use crate::services::test_utils;
    use tempfile::TempDir;

    #[test]
    fn delete_removes_assignments_across_every_route() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let breakfast = test_utils::insert_route(&conn, "breakfast");
        let dinner = test_utils::insert_route(&conn, "dinner");
        let croissant = test_utils::insert_item(&conn, "croissant");
        let espresso = test_utils::insert_item(&conn, "espresso");

        replace_assignments(
            &config.database_path,
            breakfast,
            &format!("{},{}", croissant, espresso),
        )
        .expect("assign breakfast");
        replace_assignments(&config.database_path, dinner, &croissant.to_string())
            .expect("assign dinner");

        delete_item(&config.database_path, croissant).expect("delete");

        let dangling: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM route_items WHERE item_id = ?1",
                params![croissant],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(dangling, 0);

        let gone: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM items WHERE id = ?1",
                params![croissant],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(gone, 0);

        // The other item keeps its slot.
        let kept: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM route_items WHERE item_id = ?1",
                params![espresso],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(kept, 1);
    }
}
