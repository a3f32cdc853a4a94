//! File modification times.
//!
//! Item dates use whole seconds; cache dependencies record nanoseconds so
//! two edits within one second still invalidate.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Modification time in unix seconds.
pub fn mtime_secs(path: &Path) -> Option<i64> {
    let since = get_mtime(path)?.duration_since(UNIX_EPOCH).ok()?;
    i64::try_from(since.as_secs()).ok()
}

/// Modification time in nanoseconds since the epoch.
pub fn mtime_nanos(path: &Path) -> Option<u64> {
    let since = get_mtime(path)?.duration_since(UNIX_EPOCH).ok()?;
    u64::try_from(since.as_nanos()).ok()
}
