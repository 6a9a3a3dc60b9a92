/// Local export of a stored photo
///
/// Decodes the photo's inline image data back to bytes and writes them
/// wherever the user points the native save dialog, prefilled with the
/// original file name. No store interaction.
use super::decode;
use crate::state::data::PhotoRecord;
use rfd::FileDialog;
use std::path::PathBuf;

/// Save a photo's image under its stored file name
///
/// Returns `Ok(None)` when the user cancels the dialog.
pub fn export_photo(photo: &PhotoRecord) -> Result<Option<PathBuf>, String> {
    let bytes = decode::data_url_bytes(&photo.image_url)?;

    let Some(target) = FileDialog::new()
        .set_title("บันทึกรูปภาพ")
        .set_file_name(photo.file_name.as_str())
        .save_file()
    else {
        return Ok(None);
    };

    std::fs::write(&target, bytes)
        .map_err(|e| format!("Failed to write {}: {}", target.display(), e))?;
    Ok(Some(target))
}
