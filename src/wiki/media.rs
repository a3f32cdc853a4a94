//! Media preview sizing.

use crate::utils::mime::is_previewable_image;
use std::path::Path;

/// Bounding box of inline previews.
pub const PREVIEW_SIZE: u32 = 500;

/// Bounding box of each side of a media diff table.
pub const DIFF_PREVIEW_SIZE: u32 = 300;

/// Preview dimensions of an image scaled to fit `max` x `max`.
///
/// `None` when `id` is not a previewable image or the file can't be read.
/// Images already within the box keep their size.
pub fn preview_size(id: &str, path: &Path, max: u32) -> Option<(u32, u32)> {
    if !is_previewable_image(id) {
        return None;
    }
    let (w, h) = image::image_dimensions(path).ok()?;
    Some(fit(w, h, max))
}

fn fit(w: u32, h: u32, max: u32) -> (u32, u32) {
    if w == 0 || h == 0 || (w <= max && h <= max) {
        return (w, h);
    }
    let ratio = (f64::from(max) / f64::from(w)).min(f64::from(max) / f64::from(h));
    (
        (f64::from(w) * ratio).floor() as u32,
        (f64::from(h) * ratio).floor() as u32,
    )
}
