use rusqlite::Row;

/// A display item: the label shown under its icon and the text its QR code
/// carries. `image_path` is the public path of the uploaded icon.
#[derive(Clone, Debug)]
pub struct Item {
    pub id: i64,
    pub label: String,
    pub qr_text: String,
    pub image_path: String,
}

impl Item {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            label: row.get(1)?,
            qr_text: row.get(2)?,
            image_path: row.get(3)?,
        })
    }
}
