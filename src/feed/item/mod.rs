//! Change record -> feed item.
//!
//! Every field of a [`FeedItem`] is derived from one [`ChangeRecord`] plus
//! what the wiki knows about it:
//!
//! | Field         | Source                                                |
//! |---------------|-------------------------------------------------------|
//! | `date`        | record date, else file mtime, else metadata           |
//! | `title`       | first heading or id, plus the edit summary            |
//! | `link`        | see [`link`]                                          |
//! | `description` | see [`content`]                                       |
//! | `author`      | see [`author`]                                        |
//! | `categories`  | metadata subjects, else the namespace                 |

mod author;
mod content;
mod link;

use super::options::FeedOptions;
use crate::config::SiteConfig;
use crate::core::id::namespace_of;
use crate::debug;
use crate::utils::html::strip_tags;
use crate::wiki::urls::Urls;
use crate::wiki::{ChangeRecord, Metadata, Wiki};

pub use author::{ANONYMOUS, ANONYMOUS_EMAIL};

/// One entry of the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Markup; formats escape it as text.
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub categories: Vec<String>,
    /// Unix seconds.
    pub date: Option<i64>,
}

/// Everything item building reads. Shared across worker threads.
pub struct ItemContext<'a> {
    pub config: &'a SiteConfig,
    pub options: &'a FeedOptions,
    pub wiki: &'a Wiki,
    pub urls: &'a Urls,
}

impl ItemContext<'_> {
    pub fn build(&self, record: &ChangeRecord) -> FeedItem {
        let meta = self.metadata(record);
        let date = self.date(record, meta.as_ref());
        let (author, author_email) = author::resolve(
            record.author.as_deref(),
            &self.config.users,
            self.wiki.users.as_ref(),
        );

        FeedItem {
            title: self.title(record, meta.as_ref()),
            link: link::build(self.urls, self.options.link_to, record, date),
            description: content::build(self, record, meta.as_ref(), date),
            author,
            author_email,
            categories: categories(record, meta.as_ref()),
            date,
        }
    }

    /// Page metadata; media has none.
    fn metadata(&self, record: &ChangeRecord) -> Option<Metadata> {
        if record.is_media {
            return None;
        }
        self.wiki
            .meta
            .metadata(&record.id)
            .inspect_err(|e| debug!("feed"; "metadata of {} unavailable: {:#}", record.id, e))
            .ok()
            .flatten()
    }

    fn date(&self, record: &ChangeRecord, meta: Option<&Metadata>) -> Option<i64> {
        if let Some(date) = record.date {
            // zero is an explicit "no date"
            return (date != 0).then_some(date);
        }
        let content = &self.wiki.content;
        let mtime = if record.is_media {
            content.media_mtime(&record.id)
        } else {
            content.page_mtime(&record.id)
        };
        mtime.or_else(|| meta.and_then(|m| m.modified))
    }

    fn title(&self, record: &ChangeRecord, meta: Option<&Metadata>) -> String {
        let mut title = meta
            .filter(|_| self.config.site.use_heading)
            .and_then(|m| m.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| record.id.clone());

        if self.config.feed.show_summary
            && let Some(summary) = record.summary.as_deref()
        {
            let summary = strip_tags(summary);
            let summary = summary.trim();
            if !summary.is_empty() {
                title.push_str(" - ");
                title.push_str(summary);
            }
        }
        title
    }
}

fn categories(record: &ChangeRecord, meta: Option<&Metadata>) -> Vec<String> {
    if let Some(meta) = meta
        && !meta.subject.is_empty()
    {
        return meta.subject.clone();
    }
    let ns = namespace_of(&record.id);
    if ns.is_empty() {
        Vec::new()
    } else {
        vec![ns.to_string()]
    }
}
