use rusqlite::Row;

/// The single administrator account, seeded at first startup.
#[derive(Clone, Debug)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
}

impl User {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            hashed_password: row.get(2)?,
        })
    }
}
