//! MIME type constants and media classification.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const XML: &str = "application/xml";
    pub const TEXT_XML: &str = "text/xml";
    pub const ATOM: &str = "application/atom+xml";
}

/// Whether a media id names an image a browser can preview inline.
///
/// Matches the extensions the preview scaler understands (jpeg, gif, png).
pub fn is_previewable_image(name: &str) -> bool {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    matches!(ext.as_deref(), Some("jpg" | "jpeg" | "gif" | "png"))
}
