//! Helpers shared by the multipart form handlers: reading text parts and
//! streaming uploaded files to the media directory.

use actix_multipart::Field;
use futures_util::StreamExt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Form name of a multipart part, if the part carries one.
pub(crate) fn field_name(field: &Field) -> Option<String> {
    field
        .content_disposition()
        .and_then(|cd| cd.get_name().map(|n| n.to_string()))
}

/// Original filename of an uploaded file part. Browsers send an empty
/// filename for optional file inputs left blank; those yield `None`.
pub(crate) fn filename(field: &Field) -> Option<String> {
    field
        .content_disposition()
        .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
        .filter(|f| !f.is_empty())
}

/// Collects a text part into a UTF-8 string.
pub(crate) async fn read_text(field: &mut Field) -> Result<String, Box<dyn std::error::Error>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8(bytes)?)
}

/// Streams an uploaded file into `dir/{filename}`. A previous upload with
/// the same name is overwritten.
pub(crate) async fn save_file(
    field: &mut Field,
    dir: &Path,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(dir.join(filename))?;
    while let Some(chunk) = field.next().await {
        file.write_all(&chunk?)?;
    }
    Ok(())
}
