use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use rusqlite::params;
use serde::Deserialize;

use crate::config::Config;
use crate::db;
use crate::model::item::Item;
use crate::model::route_item::RouteItem;
use crate::model::route_set::RouteSet;
use crate::services::{auth, redirect_to, render_page};

#[derive(Template)]
#[template(path = "assign.html")]
struct AssignPage {
    route: RouteSet,
    assigned: Vec<Item>,
    available: Vec<Item>,
    /// Comma-separated id list prefilled into the order input.
    order: String,
}

#[derive(Deserialize)]
pub(crate) struct AssignForm {
    order: String,
}

/// `GET /admin/routes/{route_id}/assign`: the route's current items (in
/// slot insertion order) and the pool of items not yet assigned.
pub(crate) async fn form(
    session: Session,
    config: web::Data<Config>,
    route_id: web::Path<i64>,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match load_assignment(&config.database_path, *route_id) {
        Ok(Some((route, assigned, available))) => {
            let order = assigned
                .iter()
                .map(|item| item.id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            render_page(&AssignPage {
                route,
                assigned,
                available,
                order,
            })
        }
        Ok(None) => HttpResponse::NotFound().body("Route not found"),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error loading assignment: {}", e))
        }
    }
}

/// `POST /admin/routes/{route_id}/assign`: replaces the route's whole
/// ordering with the submitted id list and returns to the assign screen.
pub(crate) async fn submit(
    session: Session,
    config: web::Data<Config>,
    route_id: web::Path<i64>,
    payload: web::Form<AssignForm>,
) -> impl Responder {
    if let Some(redirect) = auth::guard(&session) {
        return redirect;
    }
    match replace_assignments(&config.database_path, *route_id, &payload.order) {
        Ok(()) => redirect_to(&format!("/admin/routes/{}/assign", *route_id)),
        Err(e) => HttpResponse::BadRequest().body(format!("Error saving order: {}", e)),
    }
}

type Assignment = (RouteSet, Vec<Item>, Vec<Item>);

/// Loads the route, the items currently assigned to it and the remaining
/// pool. Membership is decided by item id.
pub(crate) fn load_assignment(
    database_path: &str,
    route_id: i64,
) -> Result<Option<Assignment>, String> {
    let conn = db::open(database_path).map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT id, route, title, rows, cols, timeout, background_path
             FROM route_sets WHERE id = ?1",
        )
        .map_err(|e| e.to_string())?;
    let route = match stmt.query_row(params![route_id], |row| RouteSet::from_row(row)) {
        Ok(route) => route,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };

    let mut item_stmt = conn
        .prepare("SELECT id, label, qr_text, image_path FROM items")
        .map_err(|e| e.to_string())?;
    let all_items: Vec<Item> = item_stmt
        .query_map([], |row| Item::from_row(row))
        .map_err(|e| e.to_string())?
        .filter_map(Result::ok)
        .collect();

    let mut link_stmt = conn
        .prepare("SELECT id, route_id, item_id, position FROM route_items WHERE route_id = ?1")
        .map_err(|e| e.to_string())?;
    let links: Vec<RouteItem> = link_stmt
        .query_map(params![route_id], |row| RouteItem::from_row(row))
        .map_err(|e| e.to_string())?
        .filter_map(Result::ok)
        .collect();

    let assigned_ids: Vec<i64> = links.iter().map(|link| link.item_id).collect();
    let assigned = assigned_ids
        .iter()
        .filter_map(|id| all_items.iter().find(|item| item.id == *id).cloned())
        .collect();
    let available = all_items
        .into_iter()
        .filter(|item| !assigned_ids.contains(&item.id))
        .collect();

    Ok(Some((route, assigned, available)))
}

/// Replaces the route's slot set inside one transaction: every existing
/// row is deleted, then one row per id is inserted with a 1-based
/// position. Ids omitted from `order` drop out; duplicate ids insert
/// duplicate slots. An unparsable id aborts the transaction and the prior
/// ordering stays in place.
pub(crate) fn replace_assignments(
    database_path: &str,
    route_id: i64,
    order: &str,
) -> Result<(), String> {
    let mut conn = db::open(database_path).map_err(|e| e.to_string())?;
    let tx = conn.transaction().map_err(|e| e.to_string())?;

    tx.execute(
        "DELETE FROM route_items WHERE route_id = ?1",
        params![route_id],
    )
    .map_err(|e| e.to_string())?;

    let mut position = 0i64;
    for raw in order.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let item_id: i64 = raw
            .parse()
            .map_err(|_| format!("Invalid item id in order: {}", raw))?;
        position += 1;
        tx.execute(
            "INSERT INTO route_items (route_id, item_id, position) VALUES (?1, ?2, ?3)",
            params![route_id, item_id, position],
        )
        .map_err(|e| e.to_string())?;
    }

    tx.commit().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn slots(conn: &Connection, route_id: i64) -> Vec<(i64, i64)> {
        let mut stmt = conn
            .prepare(
                "SELECT item_id, position FROM route_items
                 WHERE route_id = ?1 ORDER BY position",
            )
            .expect("prepare");
        stmt.query_map(params![route_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .expect("query")
            .filter_map(Result::ok)
            .collect()
    }

    #[test]
    fn submitted_order_becomes_contiguous_positions() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let route = test_utils::insert_route(&conn, "lunch");
        let a = test_utils::insert_item(&conn, "soup");
        let b = test_utils::insert_item(&conn, "salad");
        let c = test_utils::insert_item(&conn, "stew");

        replace_assignments(&config.database_path, route, &format!("{},{},{}", c, a, b))
            .expect("assign");

        assert_eq!(slots(&conn, route), vec![(c, 1), (a, 2), (b, 3)]);
    }

    #[test]
    fn resubmission_fully_replaces_the_set() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let route = test_utils::insert_route(&conn, "lunch");
        let a = test_utils::insert_item(&conn, "soup");
        let b = test_utils::insert_item(&conn, "salad");
        let c = test_utils::insert_item(&conn, "stew");

        replace_assignments(&config.database_path, route, &format!("{},{}", a, b))
            .expect("first");
        replace_assignments(&config.database_path, route, &c.to_string()).expect("second");

        assert_eq!(slots(&conn, route), vec![(c, 1)]);
    }

    #[test]
    fn empty_order_clears_every_slot() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let route = test_utils::insert_route(&conn, "lunch");
        let a = test_utils::insert_item(&conn, "soup");

        replace_assignments(&config.database_path, route, &a.to_string()).expect("assign");
        replace_assignments(&config.database_path, route, "").expect("clear");

        assert!(slots(&conn, route).is_empty());
    }

    #[test]
    fn duplicate_ids_insert_duplicate_slots() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let route = test_utils::insert_route(&conn, "lunch");
        let a = test_utils::insert_item(&conn, "soup");

        replace_assignments(&config.database_path, route, &format!("{},{}", a, a))
            .expect("assign");

        assert_eq!(slots(&conn, route), vec![(a, 1), (a, 2)]);
    }

    #[test]
    fn invalid_id_keeps_the_previous_ordering() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let route = test_utils::insert_route(&conn, "lunch");
        let a = test_utils::insert_item(&conn, "soup");

        replace_assignments(&config.database_path, route, &a.to_string()).expect("assign");
        let err = replace_assignments(&config.database_path, route, &format!("{},oops", a))
            .expect_err("must fail");
        assert!(err.contains("Invalid item id"));

        assert_eq!(slots(&conn, route), vec![(a, 1)]);
    }

    #[test]
    fn load_assignment_partitions_assigned_and_available() {
        let dir = TempDir::new().expect("temp dir");
        let config = test_utils::test_config(&dir);
        crate::db::init(&config).expect("db init");

        let conn = db::open(&config.database_path).expect("open");
        let route = test_utils::insert_route(&conn, "lunch");
        let a = test_utils::insert_item(&conn, "soup");
        let b = test_utils::insert_item(&conn, "salad");

        replace_assignments(&config.database_path, route, &a.to_string()).expect("assign");

        let (_, assigned, available) = load_assignment(&config.database_path, route)
            .expect("load")
            .expect("present");
        assert_eq!(assigned.iter().map(|i| i.id).collect::<Vec<_>>(), vec![a]);
        assert_eq!(available.iter().map(|i| i.id).collect::<Vec<_>>(), vec![b]);

        assert!(load_assignment(&config.database_path, route + 50)
            .expect("load")
            .is_none());
    }
}
