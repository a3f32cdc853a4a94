//! Feed generation service.
//!
//! # Pipeline
//!
//! ```text
//! FeedRequest
//!   │
//!   ├─ [feed].enable ──────────────────────────────▶ 404 <error>
//!   ├─ FeedOptions::resolve + options_postprocess
//!   ├─ cache key ─▶ CacheStore::load ─▶ freshness::check
//!   │                                    ├─ Fresh ─▶ 200 / 304
//!   │                                    └─ Stale
//!   ├─ source::select ─▶ items (rayon) ─▶ hooks ─▶ FeedDocument::render
//!   └─ CacheStore::store ──────────────────────────▶ 200 / 304
//! ```
//!
//! A failed build answers 500 and leaves the cache untouched.

pub mod error;
pub mod format;
pub mod hooks;
pub mod item;
pub mod options;
pub mod response;
pub mod source;

pub use error::FeedError;
pub use format::{FeedDocument, FeedMeta};
pub use hooks::{FeedHook, Hooks};
pub use item::FeedItem;
pub use options::{FeedOptions, Params};
pub use response::{FeedRequest, FeedResponse};

use crate::config::{FeedMode, SiteConfig};
use crate::freshness::{self, CacheEntry, CacheStore, Freshness};
use crate::wiki::urls::Urls;
use crate::wiki::{ChangeRecord, Wiki};
use crate::{debug, log};
use anyhow::Result;
use item::ItemContext;
use rayon::prelude::*;
use std::sync::Arc;

/// Answers feed requests against one config snapshot.
#[derive(Clone)]
pub struct FeedService {
    config: Arc<SiteConfig>,
    wiki: Wiki,
    cache: Arc<dyn CacheStore>,
    hooks: Hooks,
}

impl FeedService {
    pub fn new(config: Arc<SiteConfig>, wiki: Wiki, cache: Arc<dyn CacheStore>, hooks: Hooks) -> Self {
        Self {
            config,
            wiki,
            cache,
            hooks,
        }
    }

    /// Filesystem collaborators and the configured cache backend.
    pub fn open(config: Arc<SiteConfig>) -> Result<Self> {
        let wiki = Wiki::open(&config)?;
        let cache = freshness::cache::open(&config.cache);
        Ok(Self::new(config, wiki, cache, Hooks::builtin()))
    }

    pub fn config(&self) -> &Arc<SiteConfig> {
        &self.config
    }

    /// Handle one request at time `now` (unix seconds).
    pub fn handle(&self, request: &FeedRequest, now: i64) -> FeedResponse {
        match self.try_handle(request, now) {
            Ok(response) => response,
            Err(e) => {
                if !matches!(e, FeedError::FeatureDisabled) {
                    log!("error"; "feed: {}", e);
                }
                FeedResponse::error(&e)
            }
        }
    }

    fn try_handle(&self, request: &FeedRequest, now: i64) -> Result<FeedResponse, FeedError> {
        if !self.config.feed.enable {
            return Err(FeedError::FeatureDisabled);
        }

        let mut options = FeedOptions::resolve(&request.params, &self.config);
        self.hooks.options_postprocess(&mut options);

        let key = cache_key(&options, request);
        let cached = self.cache.load(&key);
        match freshness::check(cached.as_ref(), request.params.flag("purge"), now) {
            Freshness::Fresh => {
                if let Some(entry) = cached {
                    debug!("cache"; "hit {}", key);
                    let location = self.config.site.debug.then(|| self.cache.location(&key));
                    return Ok(FeedResponse::from_entry(request, &entry, options.mime_type(), location));
                }
            }
            Freshness::Stale(reason) => debug!("cache"; "rebuild {} ({})", key, reason),
        }

        let body = self.render(&options, request.user.as_deref(), now)?;
        let entry = CacheEntry::new(
            &key,
            body,
            &self.config.cache_dependencies(),
            self.config.feed.update_interval,
            now,
        );
        self.cache.store(&entry)?;

        Ok(FeedResponse::from_entry(request, &entry, options.mime_type(), None))
    }

    /// Build and serialize the feed for `options` as seen by `user`.
    pub fn render(&self, options: &FeedOptions, user: Option<&str>, now: i64) -> Result<String, FeedError> {
        self.document(options, user, now)
            .render(options.format)
            .map_err(|e| FeedError::BuildFailure(format!("{e:#}")))
    }

    /// Select the records `user` may read, build items and wrap them with
    /// channel metadata.
    pub fn document(&self, options: &FeedOptions, user: Option<&str>, now: i64) -> FeedDocument {
        let records = source::select(options, &self.config, &self.wiki, user);
        let items = match self.hooks.before_items(options, &records) {
            Some(items) => items,
            None => self.build_items(options, &records),
        };
        self.hooks.after_items(options, &items);

        FeedDocument::new(self.meta(options, now), items)
    }

    fn build_items(&self, options: &FeedOptions, records: &[ChangeRecord]) -> Vec<FeedItem> {
        let urls = Urls::new(self.config.site.base_url());
        let ctx = ItemContext {
            config: &self.config,
            options,
            wiki: &self.wiki,
            urls: &urls,
        };

        let built: Vec<FeedItem> = records.par_iter().map(|r| ctx.build(r)).collect();

        built
            .into_iter()
            .zip(records)
            .filter_map(|(item, record)| {
                let added = self.hooks.before_item_add(&item, record);
                self.hooks.after_item_add(&item, added);
                added.then_some(item)
            })
            .collect()
    }

    fn meta(&self, options: &FeedOptions, now: i64) -> FeedMeta {
        let site = &self.config.site;
        let mut title = site.title.clone();
        if let Some(ns) = &options.namespace {
            title.push(' ');
            title.push_str(ns);
        }
        if options.mode == FeedMode::Search
            && let Some(query) = &options.search_query
        {
            title.push_str(" - Search: ");
            title.push_str(query);
        }

        let base = site.base_url();
        FeedMeta {
            title,
            self_link: Urls::new(base.as_str()).feed(),
            link: base,
            description: site.description.clone(),
            language: site.language.clone(),
            generated: Some(now),
        }
    }
}

/// Options plus the requester's identity and endpoint.
fn cache_key(options: &FeedOptions, request: &FeedRequest) -> String {
    format!(
        "{}${}${}${}",
        options.cache_key(),
        request.user.as_deref().unwrap_or_default(),
        request.host,
        request.port
    )
}
