//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `expand_tilde` - leading `~` to the home directory
//! - `resolve_config_path` - config-relative paths with `~` expansion

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Resolve a path from the config file against the project root.
///
/// A leading `~` is expanded to the home directory; relative results are
/// joined with `root`.
pub fn resolve_config_path(path: &Path, root: &Path) -> PathBuf {
    let path = expand_tilde(path);
    let full_path = if path.is_relative() {
        root.join(&path)
    } else {
        path
    };
    normalize_path(&full_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_config_path_relative_to_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let resolved = resolve_config_path(Path::new("data"), dir.path());
        assert!(resolved.ends_with("data"));
        assert!(resolved.is_absolute());
    }

    #[test]
    fn test_expand_tilde_only_leading() {
        assert_eq!(expand_tilde(Path::new("conf/a~b")), PathBuf::from("conf/a~b"));
        assert!(!expand_tilde(Path::new("~/wikifeed.toml")).starts_with("~"));
    }

    #[test]
    fn test_resolve_config_path_absolute_untouched() {
        let resolved = resolve_config_path(Path::new("/srv/wiki/data"), Path::new("/elsewhere"));
        assert_eq!(resolved, PathBuf::from("/srv/wiki/data"));
    }
}
