//! Request parameters -> typed feed options.
//!
//! | Param          | Field          | Default             |
//! |----------------|----------------|---------------------|
//! | `mode`         | `mode`         | `recent`            |
//! | `linkto`       | `link_to`      | `[feed].link_to`    |
//! | `content`      | `item_content` | `[feed].content`    |
//! | `ns`           | `namespace`    | none                |
//! | `num`          | `items`        | `[feed].items`      |
//! | `minor`        | `show_minor`   | false               |
//! | `onlynewpages` | `only_new`     | false               |
//! | `sort`         | `sort`         | `natural`           |
//! | `q`            | `search_query` | none                |
//! | `view`         | `content_type` | `[feed].media`      |
//! | `type`         | `format`       | `[feed].format`     |
//!
//! Invalid values never reach the client: the default is used instead.

use super::error::FeedError;
use crate::config::{
    ContentType, FeedFormat, FeedMode, ItemContent, LinkTo, SiteConfig, SortOrder, UnknownToken,
};
use crate::core::id::clean_id;
use crate::debug;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use rustc_hash::FxHashMap;
use std::fmt::Display;
use std::str::FromStr;

// ============================================================================
// Raw parameters
// ============================================================================

/// Query-string parameters of one request. Later duplicates win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(FxHashMap<String, String>);

impl Params {
    /// Parse `a=1&b=2` (leading `?` allowed).
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Non-empty trimmed value.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Boolean flag: absent, empty, `0`, `false`, `no`, `off` are false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| {
            !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "" | "0" | "false" | "no" | "off"
            )
        })
    }
}

// ============================================================================
// Options
// ============================================================================

/// Fully resolved feed options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOptions {
    pub mode: FeedMode,
    pub link_to: LinkTo,
    pub item_content: ItemContent,
    pub namespace: Option<String>,
    pub items: u32,
    pub show_minor: bool,
    pub only_new: bool,
    pub sort: SortOrder,
    pub search_query: Option<String>,
    pub content_type: ContentType,
    pub format: FeedFormat,
}

impl FeedOptions {
    /// Resolve request parameters against config defaults.
    pub fn resolve(params: &Params, config: &SiteConfig) -> Self {
        let feed = &config.feed;
        Self {
            mode: parse_or(params, "mode", FeedMode::Recent),
            link_to: parse_or(params, "linkto", feed.link_to),
            item_content: parse_or(params, "content", feed.content),
            namespace: params
                .value("ns")
                .map(|ns| clean_id(ns, config.site.deaccent))
                .filter(|ns| !ns.is_empty()),
            items: parse_count(params, "num", feed.items),
            show_minor: params.flag("minor"),
            only_new: params.flag("onlynewpages"),
            sort: parse_or(params, "sort", SortOrder::Natural),
            search_query: params.value("q").map(String::from),
            content_type: parse_or(params, "view", feed.media),
            format: params
                .value("type")
                .map_or(feed.format, FeedFormat::from_token),
        }
    }

    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Stable rendering of every field that shapes the document.
    pub fn cache_key(&self) -> String {
        let query = self
            .search_query
            .as_deref()
            .map(|q| utf8_percent_encode(q, NON_ALPHANUMERIC).to_string())
            .unwrap_or_default();
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.format,
            self.mode,
            self.link_to,
            self.item_content,
            self.namespace.as_deref().unwrap_or_default(),
            self.items,
            u8::from(self.show_minor),
            u8::from(self.only_new),
            self.sort,
            self.content_type,
            query,
        )
    }
}

fn parse_or<T>(params: &Params, name: &'static str, default: T) -> T
where
    T: FromStr<Err = UnknownToken> + Display + Copy,
{
    let Some(raw) = params.value(name) else {
        return default;
    };
    raw.parse().unwrap_or_else(|_| {
        let err = FeedError::InvalidParameter {
            name,
            value: raw.to_string(),
        };
        debug!("feed"; "{}, using `{}`", err, default);
        default
    })
}

/// Signed integer clamped at zero; non-numeric values use the default.
fn parse_count(params: &Params, name: &'static str, default: u32) -> u32 {
    let Some(raw) = params.value(name) else {
        return default;
    };
    match raw.parse::<i64>() {
        Ok(n) => n.clamp(0, i64::from(u32::MAX)) as u32,
        Err(_) => {
            debug!("feed"; "{}, using `{}`", FeedError::InvalidParameter { name, value: raw.to_string() }, default);
            default
        }
    }
}
