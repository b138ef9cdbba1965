use rusqlite::Row;

/// A named display route. `route` is the public lookup key used in
/// `/r/{route}`; `rows` and `cols` describe the grid the view renders.
#[derive(Clone, Debug)]
pub struct RouteSet {
    pub id: i64,
    pub route: String,
    pub title: String,
    pub rows: u32,
    pub cols: u32,
    /// Per-route inactivity timeout in milliseconds. Stored for each route
    /// but the public view renders the global configured value.
    pub timeout: u32,
    pub background_path: Option<String>,
}

impl RouteSet {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            route: row.get(1)?,
            title: row.get(2)?,
            rows: row.get(3)?,
            cols: row.get(4)?,
            timeout: row.get(5)?,
            background_path: row.get(6)?,
        })
    }
}
