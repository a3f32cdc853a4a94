//! Cache freshness decision.
//!
//! ```text
//!            purge / missing / expired / dependency changed
//!   Fresh ──────────────────────────────────────────────────▶ Stale
//! ```
//!
//! A stale entry is rebuilt and replaced unconditionally.

use super::cache::CacheEntry;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(StaleReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    Purged,
    Missing,
    Expired { age: i64 },
    DependencyChanged(PathBuf),
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Purged => f.write_str("purge requested"),
            Self::Missing => f.write_str("no entry"),
            Self::Expired { age } => write!(f, "expired after {age}s"),
            Self::DependencyChanged(path) => write!(f, "{} changed", path.display()),
        }
    }
}

/// Decide whether `entry` may be served at time `now`.
pub fn check(entry: Option<&CacheEntry>, purge: bool, now: i64) -> Freshness {
    if purge {
        return Freshness::Stale(StaleReason::Purged);
    }
    let Some(entry) = entry else {
        return Freshness::Stale(StaleReason::Missing);
    };

    let age = now - entry.stored_at;
    if age < 0 || age as u64 >= entry.max_age {
        return Freshness::Stale(StaleReason::Expired { age });
    }
    if let Some(dep) = entry.dependencies.iter().find(|d| d.changed()) {
        return Freshness::Stale(StaleReason::DependencyChanged(dep.path.clone()));
    }
    Freshness::Fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn entry(max_age: u64, deps: &[PathBuf]) -> CacheEntry {
        CacheEntry::new("k", "body".into(), deps, max_age, 1_000)
    }

    #[test]
    fn test_fresh_within_max_age() {
        assert_eq!(check(Some(&entry(60, &[])), false, 1_059), Freshness::Fresh);
    }

    #[test]
    fn test_expired() {
        assert_eq!(
            check(Some(&entry(60, &[])), false, 1_060),
            Freshness::Stale(StaleReason::Expired { age: 60 })
        );
        assert!(matches!(
            check(Some(&entry(0, &[])), false, 1_000),
            Freshness::Stale(StaleReason::Expired { .. })
        ));
    }

    #[test]
    fn test_purge_and_missing() {
        assert_eq!(
            check(Some(&entry(60, &[])), true, 1_000),
            Freshness::Stale(StaleReason::Purged)
        );
        assert_eq!(check(None, false, 1_000), Freshness::Stale(StaleReason::Missing));
    }

    #[test]
    fn test_dependency_change() {
        let dir = tempfile::TempDir::new().unwrap();
        let dep = dir.path().join("wikifeed.toml");
        fs::write(&dep, "a").unwrap();
        let stored = entry(60, &[dep.clone()]);
        assert_eq!(check(Some(&stored), false, 1_001), Freshness::Fresh);

        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
        fs::File::options()
            .write(true)
            .open(&dep)
            .unwrap()
            .set_modified(later)
            .unwrap();
        assert_eq!(
            check(Some(&stored), false, 1_001),
            Freshness::Stale(StaleReason::DependencyChanged(dep))
        );
    }
}
