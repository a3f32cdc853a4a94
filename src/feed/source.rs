//! Source selectors: which records a feed is made of.
//!
//! | Mode     | Records                                         | Limited by `num` |
//! |----------|-------------------------------------------------|------------------|
//! | `recent` | change log, newest first, one per id            | yes              |
//! | `list`   | pages directly inside `ns`                      | no               |
//! | `search` | full-text hits, most relevant first             | no               |
//!
//! Hidden pages and records the reader may not read are left out in every
//! mode; in `recent` mode they do not count against `num`. Selector failures
//! are logged and yield an empty list.

use super::options::FeedOptions;
use crate::config::{ContentType, FeedMode, SiteConfig, SortOrder};
use crate::core::id::namespace_of;
use crate::debug;
use crate::wiki::{Acl, ChangeRecord, RecentsFilter, Wiki};
use anyhow::Result;
use regex::Regex;
use std::cmp::Reverse;

/// Records for `options.mode` that `user` may see.
pub fn select(options: &FeedOptions, config: &SiteConfig, wiki: &Wiki, user: Option<&str>) -> Vec<ChangeRecord> {
    let visibility = Visibility::new(config, wiki.acl.as_ref(), user);
    let result = match options.mode {
        FeedMode::Recent => recent_changes(options, config, wiki, &visibility),
        FeedMode::List => namespace_listing(options, wiki),
        FeedMode::Search => search_results(options, config, wiki),
    };

    let mut records = result.unwrap_or_else(|e| {
        debug!("feed"; "{} selector failed: {:#}", options.mode, e);
        Vec::new()
    });
    records.retain(|r| visibility.admits(r));
    records
}

/// Change-log filters for `options` under `config`.
pub fn recents_filter(options: &FeedOptions, config: &SiteConfig) -> RecentsFilter {
    let media = config.wiki.media_revisions;
    RecentsFilter {
        skip_deleted: !config.feed.show_deleted,
        skip_minors: !options.show_minor,
        only_creation: options.only_new,
        media_only: media && options.content_type == ContentType::Media,
        media_mixed: media && options.content_type == ContentType::Both,
    }
}

/// Hidden-page pattern plus read permissions of one reader.
struct Visibility<'a> {
    hidden: Option<Regex>,
    acl: &'a dyn Acl,
    user: Option<&'a str>,
}

impl<'a> Visibility<'a> {
    fn new(config: &SiteConfig, acl: &'a dyn Acl, user: Option<&'a str>) -> Self {
        // validated at load
        let hidden = config
            .site
            .hidden_pages
            .as_deref()
            .and_then(|pattern| Regex::new(pattern).ok());
        Self { hidden, acl, user }
    }

    fn admits(&self, record: &ChangeRecord) -> bool {
        if record.is_media {
            let scope = format!("{}:*", namespace_of(&record.id));
            return self.acl.can_read(&scope, self.user);
        }
        !self.hidden.as_ref().is_some_and(|re| re.is_match(&record.id))
            && self.acl.can_read(&record.id, self.user)
    }
}

fn recent_changes(
    options: &FeedOptions,
    config: &SiteConfig,
    wiki: &Wiki,
    visibility: &Visibility,
) -> Result<Vec<ChangeRecord>> {
    wiki.changes.recent(
        options.items as usize,
        options.namespace.as_deref(),
        recents_filter(options, config),
        &|record| visibility.admits(record),
    )
}

fn namespace_listing(options: &FeedOptions, wiki: &Wiki) -> Result<Vec<ChangeRecord>> {
    let mut pages = wiki
        .content
        .list_namespace(options.namespace.as_deref().unwrap_or_default())?;

    match options.sort {
        SortOrder::Natural => pages.sort_by(|a, b| a.id.cmp(&b.id)),
        SortOrder::Date => pages.sort_by_key(|p| (Reverse(p.mtime), p.id.clone())),
    }

    Ok(pages
        .into_iter()
        .map(|page| ChangeRecord::page(page.id))
        .collect())
}

fn search_results(options: &FeedOptions, config: &SiteConfig, wiki: &Wiki) -> Result<Vec<ChangeRecord>> {
    let Some(query) = options.search_query.as_deref().filter(|_| config.search.enable) else {
        return Ok(Vec::new());
    };
    Ok(wiki
        .search
        .search(query)?
        .into_iter()
        .map(ChangeRecord::page)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::feed::options::Params;
    use crate::wiki::memory::MemoryWiki;
    use crate::wiki::{ChangeKind, ChangeLog};
    use std::sync::Arc;

    fn run(wiki: MemoryWiki, config_src: &str, query: &str) -> Vec<String> {
        run_as(wiki, config_src, query, None)
    }

    fn run_as(wiki: MemoryWiki, config_src: &str, query: &str, user: Option<&str>) -> Vec<String> {
        let config = test_parse_config(config_src);
        let options = FeedOptions::resolve(&Params::from_query(query), &config);
        let (_, wiki) = wiki.into_wiki();
        select(&options, &config, &wiki, user)
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    fn change(id: &str, date: i64, kind: ChangeKind) -> ChangeRecord {
        ChangeRecord {
            date: Some(date),
            kind: Some(kind),
            ..ChangeRecord::page(id)
        }
    }

    #[test]
    fn test_recents_filter_flags() {
        let config = test_parse_config("[feed]\nshow_deleted = false");
        let options = FeedOptions::resolve(&Params::from_query("view=media&minor=1"), &config);
        let filter = recents_filter(&options, &config);
        assert!(filter.skip_deleted);
        assert!(!filter.skip_minors);
        assert!(filter.media_only);
        assert!(!filter.media_mixed);

        let config = test_parse_config("[wiki]\nmedia_revisions = false");
        let options = FeedOptions::resolve(&Params::default(), &config);
        let filter = recents_filter(&options, &config);
        assert!(!filter.media_only && !filter.media_mixed);
        assert!(filter.skip_minors);
    }

    #[test]
    fn test_recent_latest_change_wins() {
        let wiki = MemoryWiki::new()
            .with_change(change("a", 1, ChangeKind::Create))
            .with_change(change("b", 2, ChangeKind::Create))
            .with_change(change("a", 3, ChangeKind::Edit));
        assert_eq!(run(wiki, "", ""), vec!["a", "b"]);
    }

    #[test]
    fn test_recent_limit_and_hidden() {
        let wiki = MemoryWiki::new()
            .with_change(change("wiki:syntax", 1, ChangeKind::Edit))
            .with_change(change("a", 2, ChangeKind::Edit))
            .with_change(change("b", 3, ChangeKind::Edit));
        assert_eq!(run(wiki, "[site]\nhidden_pages = \"^wiki:\"", ""), vec!["b", "a"]);

        let wiki = MemoryWiki::new()
            .with_change(change("a", 1, ChangeKind::Edit))
            .with_change(change("b", 2, ChangeKind::Edit))
            .with_change(change("wiki:syntax", 3, ChangeKind::Edit));
        assert_eq!(
            run(wiki, "[site]\nhidden_pages = \"^wiki:\"", "num=2"),
            vec!["b", "a"]
        );

        let wiki = MemoryWiki::new()
            .with_change(change("a", 2, ChangeKind::Edit))
            .with_change(change("b", 3, ChangeKind::Edit));
        assert_eq!(run(wiki, "", "num=1"), vec!["b"]);
    }

    #[test]
    fn test_recent_minor_and_new_only() {
        let wiki = || {
            MemoryWiki::new()
                .with_change(change("a", 1, ChangeKind::Create))
                .with_change(change("b", 2, ChangeKind::Minor))
        };
        assert_eq!(run(wiki(), "", ""), vec!["a"]);
        assert_eq!(run(wiki(), "", "minor=1"), vec!["b", "a"]);
        assert_eq!(run(wiki(), "", "minor=1&onlynewpages=1"), vec!["a"]);
    }

    #[test]
    fn test_listing_sort_orders() {
        let wiki = || {
            MemoryWiki::new()
                .with_page("ns:b", "b", 30)
                .with_page("ns:a", "a", 10)
                .with_page("ns:c", "c", 20)
                .with_page("ns:sub:d", "d", 40)
                .with_page("other", "o", 50)
        };
        assert_eq!(run(wiki(), "", "mode=list&ns=ns"), vec!["ns:a", "ns:b", "ns:c"]);
        assert_eq!(
            run(wiki(), "", "mode=list&ns=ns&sort=date&num=1"),
            vec!["ns:b", "ns:c", "ns:a"]
        );
        assert_eq!(run(wiki(), "", "mode=list"), vec!["other"]);
    }

    #[test]
    fn test_search_gates() {
        let wiki = || MemoryWiki::new().with_hits(&["x", "y"]);
        assert_eq!(run(wiki(), "", "mode=search&q=rust"), vec!["x", "y"]);
        assert!(run(wiki(), "", "mode=search").is_empty());
        assert!(run(wiki(), "[search]\nenable = false", "mode=search&q=rust").is_empty());
    }

    #[test]
    fn test_read_permissions_per_reader() {
        let wiki = || {
            MemoryWiki::new()
                .with_page("a", "a", 1)
                .with_page("private", "p", 2)
                .with_hits(&["private", "a"])
                .with_owner("private", "alice")
                .with_change(change("a", 1, ChangeKind::Edit))
                .with_change(change("private", 2, ChangeKind::Edit))
        };
        assert_eq!(run_as(wiki(), "", "", Some("alice")), vec!["private", "a"]);
        assert_eq!(run_as(wiki(), "", "", Some("bob")), vec!["a"]);
        assert_eq!(run_as(wiki(), "", "num=1", None), vec!["a"]);
        assert_eq!(run_as(wiki(), "", "mode=list", None), vec!["a"]);
        assert_eq!(run_as(wiki(), "", "mode=search&q=p", Some("bob")), vec!["a"]);
        assert_eq!(
            run_as(wiki(), "", "mode=search&q=p", Some("alice")),
            vec!["private", "a"]
        );
    }

    struct Broken;

    impl ChangeLog for Broken {
        fn recent(
            &self,
            _: usize,
            _: Option<&str>,
            _: RecentsFilter,
            _: &dyn Fn(&ChangeRecord) -> bool,
        ) -> Result<Vec<ChangeRecord>> {
            anyhow::bail!("log unreadable")
        }
    }

    #[test]
    fn test_selector_error_is_empty() {
        let config = test_parse_config("");
        let options = FeedOptions::resolve(&Params::default(), &config);
        let (_, mut wiki) = MemoryWiki::new().with_page("a", "a", 1).into_wiki();
        wiki.changes = Arc::new(Broken);
        assert!(select(&options, &config, &wiki, None).is_empty());
    }
}
