/// File-to-data-URL decoding for the intake pipeline
///
/// Photos are stored inline in the remote store as base64 data URLs, so
/// a selected file becomes `data:<mime>;base64,<payload>` before it can
/// be previewed or committed. The mime type is sniffed from the file's
/// magic bytes, not trusted from its extension.
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};

/// Decode one file into a preview data URL
///
/// Runs on a blocking thread: reading and re-encoding a multi-megabyte
/// scan would otherwise stall the UI loop.
pub async fn read_preview(path: PathBuf) -> Result<String, String> {
    tokio::task::spawn_blocking(move || read_preview_blocking(&path))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

fn read_preview_blocking(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    to_data_url(&bytes)
}

/// Encode image bytes as a self-contained data URL
pub fn to_data_url(bytes: &[u8]) -> Result<String, String> {
    let format = image::guess_format(bytes)
        .map_err(|e| format!("Not a recognized image format: {}", e))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Recover the raw image bytes from a stored data URL
pub fn data_url_bytes(url: &str) -> Result<Vec<u8>, String> {
    if !url.starts_with("data:") {
        return Err("not a data URL".to_string());
    }
    let (_header, payload) = url
        .split_once(',')
        .ok_or_else(|| "data URL has no payload".to_string())?;
    STANDARD
        .decode(payload)
        .map_err(|e| format!("Invalid base64 payload: {}", e))
}
