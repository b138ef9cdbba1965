use rusqlite::Row;

/// One ordered slot of a route. Pure association row: its meaning is the
/// (route, item) pair it joins plus the 1-based position.
#[derive(Clone, Debug)]
pub struct RouteItem {
    pub id: i64,
    pub route_id: i64,
    pub item_id: i64,
    pub position: i64,
}

impl RouteItem {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            route_id: row.get(1)?,
            item_id: row.get(2)?,
            position: row.get(3)?,
        })
    }
}
