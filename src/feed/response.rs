//! Transport-neutral requests and responses.
//!
//! The HTTP front end and `wikifeed render` both translate to and from
//! these types; nothing here knows about sockets.

use super::error::FeedError;
use super::options::Params;
use crate::freshness::CacheEntry;
use crate::utils::date::unix_to_rfc2822;
use crate::utils::html::escape;
use crate::utils::mime;

/// One feed request.
#[derive(Debug, Clone, Default)]
pub struct FeedRequest {
    pub params: Params,
    /// Authenticated identity supplied by the front end.
    pub user: Option<String>,
    pub host: String,
    pub port: u16,
    pub if_modified_since: Option<String>,
    pub if_none_match: Option<String>,
}

impl FeedRequest {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Whether the client already holds the entry.
    fn is_current(&self, last_modified: &str, etag: &str) -> bool {
        let same = |header: &Option<String>, value: &str| {
            header.as_deref().is_some_and(|h| h.trim() == value)
        };
        same(&self.if_modified_since, last_modified) || same(&self.if_none_match, etag)
    }
}

/// Status, headers and body of a handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl FeedResponse {
    /// Serve `entry`, or 304 when the request's validators match it.
    ///
    /// `location` is set on cache hits when diagnostics are enabled.
    pub fn from_entry(
        request: &FeedRequest,
        entry: &CacheEntry,
        mime_type: &str,
        location: Option<String>,
    ) -> Self {
        let last_modified = unix_to_rfc2822(entry.stored_at);
        let etag = entry.etag();

        let mut headers = base_headers(mime_type);
        headers.push(("Last-Modified", last_modified.clone()));
        headers.push(("ETag", etag.clone()));
        if let Some(location) = location {
            headers.push(("X-Cache-Used", location));
        }

        if request.is_current(&last_modified, &etag) {
            return Self {
                status: 304,
                headers,
                body: String::new(),
            };
        }
        Self {
            status: 200,
            headers,
            body: entry.body.clone(),
        }
    }

    /// `<error>` envelope for a failed request.
    pub fn error(err: &FeedError) -> Self {
        Self {
            status: err.status(),
            headers: base_headers(mime::types::XML),
            body: format!("<error>{}</error>", escape(&err.to_string())),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn base_headers(mime_type: &str) -> Vec<(&'static str, String)> {
    vec![
        (
            "Cache-Control",
            "must-revalidate, post-check=0, pre-check=0".to_string(),
        ),
        ("Pragma", "public".to_string()),
        ("Content-Type", format!("{mime_type}; charset=utf-8")),
        ("X-Robots-Tag", "noindex".to_string()),
    ]
}
