/// Photo intake and export
///
/// This module turns user-selected files into inline preview data and
/// back again:
/// - Decoding file bytes into base64 data URLs (decode.rs)
/// - Saving a photo's image data under its original file name (export.rs)
pub mod decode;
pub mod export;
