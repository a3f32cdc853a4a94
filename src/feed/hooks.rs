//! Extension points of the feed pipeline.
//!
//! ```text
//! resolve ─▶ options_postprocess ─▶ select ─▶ before_items ─┬─▶ build items
//!                                                          │    ├─ before_item_add (veto)
//!                                                          │    └─ after_item_add
//!                                                          └─▶ (prevented: hook items)
//!                                               ─▶ after_items ─▶ assemble
//! ```
//!
//! Hooks run in registration order on the request thread.

use super::item::FeedItem;
use super::options::FeedOptions;
use crate::debug;
use crate::wiki::ChangeRecord;
use std::sync::Arc;

/// Observer of the feed pipeline. Every method has a no-op default.
pub trait FeedHook: Send + Sync {
    /// Adjust resolved options before anything uses them.
    fn options_postprocess(&self, _options: &mut FeedOptions) {}

    /// Replace item building for the whole batch by returning the items.
    fn before_items(&self, _options: &FeedOptions, _records: &[ChangeRecord]) -> Option<Vec<FeedItem>> {
        None
    }

    /// Return `false` to drop this item.
    fn before_item_add(&self, _item: &FeedItem, _record: &ChangeRecord) -> bool {
        true
    }

    /// Called after every add attempt.
    fn after_item_add(&self, _item: &FeedItem, _added: bool) {}

    /// Called once with the final item list.
    fn after_items(&self, _options: &FeedOptions, _items: &[FeedItem]) {}
}

/// Registered hooks.
#[derive(Clone, Default)]
pub struct Hooks {
    hooks: Vec<Arc<dyn FeedHook>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hooks every service starts with.
    pub fn builtin() -> Self {
        let mut hooks = Self::new();
        hooks.register(Arc::new(TraceHook));
        hooks
    }

    pub fn register(&mut self, hook: Arc<dyn FeedHook>) {
        self.hooks.push(hook);
    }

    pub fn options_postprocess(&self, options: &mut FeedOptions) {
        for hook in &self.hooks {
            hook.options_postprocess(options);
        }
    }

    /// First hook that prevents default processing wins.
    pub fn before_items(&self, options: &FeedOptions, records: &[ChangeRecord]) -> Option<Vec<FeedItem>> {
        self.hooks
            .iter()
            .find_map(|hook| hook.before_items(options, records))
    }

    /// Any hook may veto.
    pub fn before_item_add(&self, item: &FeedItem, record: &ChangeRecord) -> bool {
        self.hooks
            .iter()
            .all(|hook| hook.before_item_add(item, record))
    }

    pub fn after_item_add(&self, item: &FeedItem, added: bool) {
        for hook in &self.hooks {
            hook.after_item_add(item, added);
        }
    }

    pub fn after_items(&self, options: &FeedOptions, items: &[FeedItem]) {
        for hook in &self.hooks {
            hook.after_items(options, items);
        }
    }
}

/// Logs every item decision at debug level.
struct TraceHook;

impl FeedHook for TraceHook {
    fn after_item_add(&self, item: &FeedItem, added: bool) {
        if added {
            debug!("feed"; "item {}", item.link);
        } else {
            debug!("feed"; "item vetoed {}", item.link);
        }
    }

    fn after_items(&self, options: &FeedOptions, items: &[FeedItem]) {
        debug!("feed"; "{} items ({} {})", items.len(), options.mode, options.format.label());
    }
}
