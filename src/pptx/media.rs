//! Image payload inlining.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Largest media part that gets inlined as a data URI, in bytes.
///
/// Anything bigger would dominate the rendered document size; such parts
/// are not inlined and their picture shapes are dropped.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Guess the MIME type of a media part from its file extension.
pub fn mime_for_part(part: &str) -> &'static str {
    let extension = part.rsplit('.').next().unwrap_or("").to_lowercase();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "emf" => "image/emf",
        "wmf" => "image/wmf",
        _ => "application/octet-stream",
    }
}

/// Encode media bytes as a self-contained `data:` URI.
pub fn data_uri(part: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_for_part(part), BASE64.encode(bytes))
}
