//! JSON-lines change log.
//!
//! One record per line, oldest first:
//!
//! ```text
//! {"date":1718461845,"id":"ns:page","type":"edit","summary":"typo","user":"alice"}
//! {"date":1718461900,"id":"ns:photo.png","type":"create","media":true}
//! ```

use super::Layout;
use crate::core::id::in_namespace;
use crate::debug;
use crate::wiki::{ChangeKind, ChangeLog, ChangeRecord, RecentsFilter};
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::fs;
use std::io::ErrorKind;

#[derive(Debug, Clone)]
pub struct FsChangeLog {
    layout: Layout,
}

impl FsChangeLog {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// All parseable records, newest first.
    fn load(&self) -> Result<Vec<ChangeRecord>> {
        let path = self.layout.changes_log();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let mut records: Vec<ChangeRecord> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("changes"; "skipping line {}: {}", n + 1, e);
                    None
                }
            })
            .collect();

        // later lines win ties
        records.reverse();
        records.sort_by_key(|r| Reverse(r.date.unwrap_or(0)));
        Ok(records)
    }

    fn exists(&self, record: &ChangeRecord) -> bool {
        if record.is_media {
            self.layout.media_file(&record.id).is_file()
        } else {
            self.layout.page_file(&record.id).is_file()
        }
    }
}

impl ChangeLog for FsChangeLog {
    fn recent(
        &self,
        limit: usize,
        namespace: Option<&str>,
        filter: RecentsFilter,
        visible: &dyn Fn(&ChangeRecord) -> bool,
    ) -> Result<Vec<ChangeRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for record in self.load()? {
            let wanted_kind = if filter.media_only {
                record.is_media
            } else {
                filter.media_mixed || !record.is_media
            };
            if !wanted_kind || seen.contains(&(record.is_media, record.id.clone())) {
                continue;
            }
            if filter.only_creation && record.kind != Some(ChangeKind::Create) {
                continue;
            }
            if filter.skip_minors && record.kind == Some(ChangeKind::Minor) {
                continue;
            }
            // an id is settled by its newest change that passes the edit filters
            seen.insert((record.is_media, record.id.clone()));

            if let Some(ns) = namespace
                && !in_namespace(&record.id, ns)
            {
                continue;
            }
            if filter.skip_deleted && !self.exists(&record) {
                continue;
            }
            if !visible(&record) {
                continue;
            }

            out.push(record);
            if out.len() == limit {
                break;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture(lines: &[&str]) -> (tempfile::TempDir, FsChangeLog) {
        let dir = tempfile::TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        fs::write(layout.changes_log(), lines.join("\n")).unwrap();
        (dir, FsChangeLog::new(layout))
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn all(_: &ChangeRecord) -> bool {
        true
    }

    fn ids(records: &[ChangeRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    const LOG: &[&str] = &[
        r#"{"date":1,"id":"a","type":"create","user":"alice"}"#,
        r#"{"date":2,"id":"ns:b","type":"create"}"#,
        r#"{"date":3,"id":"a","type":"edit","summary":"more"}"#,
        r#"{"date":4,"id":"ns:pic.png","type":"create","media":true}"#,
        r#"{"date":5,"id":"ns:b","type":"minor"}"#,
        "not json",
        r#"{"date":6,"id":"gone","type":"delete"}"#,
    ];

    #[test]
    fn test_recent_newest_first_one_per_id() {
        let (_dir, log) = fixture(LOG);
        let records = log.recent(10, None, RecentsFilter::default(), &all).unwrap();
        assert_eq!(ids(&records), vec!["gone", "ns:b", "a"]);
        assert_eq!(records[2].summary.as_deref(), Some("more"));
    }

    #[test]
    fn test_recent_limit_and_zero() {
        let (_dir, log) = fixture(LOG);
        assert_eq!(log.recent(2, None, RecentsFilter::default(), &all).unwrap().len(), 2);
        assert!(log.recent(0, None, RecentsFilter::default(), &all).unwrap().is_empty());
    }

    #[test]
    fn test_recent_skip_minors_keeps_older_change() {
        let (_dir, log) = fixture(LOG);
        let filter = RecentsFilter {
            skip_minors: true,
            ..Default::default()
        };
        let records = log.recent(10, Some("ns"), filter, &all).unwrap();
        assert_eq!(ids(&records), vec!["ns:b"]);
        assert_eq!(records[0].date, Some(2));
    }

    #[test]
    fn test_recent_only_creation() {
        let (_dir, log) = fixture(LOG);
        let filter = RecentsFilter {
            only_creation: true,
            ..Default::default()
        };
        let records = log.recent(10, None, filter, &all).unwrap();
        assert_eq!(ids(&records), vec!["ns:b", "a"]);
        assert_eq!(records[1].date, Some(1));
    }

    #[test]
    fn test_recent_media_filters() {
        let (_dir, log) = fixture(LOG);
        let media_only = RecentsFilter {
            media_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&log.recent(10, None, media_only, &all).unwrap()), vec!["ns:pic.png"]);

        let mixed = RecentsFilter {
            media_mixed: true,
            ..Default::default()
        };
        assert_eq!(
            ids(&log.recent(10, None, mixed, &all).unwrap()),
            vec!["gone", "ns:b", "ns:pic.png", "a"]
        );
    }

    #[test]
    fn test_recent_skip_deleted() {
        let (dir, log) = fixture(LOG);
        let layout = Layout::new(dir.path());
        touch(&layout.page_file("a"));
        touch(&layout.page_file("ns:b"));

        let filter = RecentsFilter {
            skip_deleted: true,
            ..Default::default()
        };
        assert_eq!(ids(&log.recent(10, None, filter, &all).unwrap()), vec!["ns:b", "a"]);
    }

    #[test]
    fn test_recent_invisible_not_counted() {
        let (_dir, log) = fixture(LOG);
        let records = log.recent(2, None, RecentsFilter::default(), &|r| r.id != "gone").unwrap();
        assert_eq!(ids(&records), vec!["ns:b", "a"]);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = FsChangeLog::new(Layout::new(dir.path()));
        assert!(log.recent(5, None, RecentsFilter::default(), &all).unwrap().is_empty());
    }
}
