//! Content repository collaborators.
//!
//! The feed pipeline only talks to the traits in this module. The bundled
//! implementations read the on-disk layout under `[wiki].data_dir`:
//!
//! ```text
//! pages/<ns>/<page>.txt                   current page source (Markdown)
//! attic/<ns>/<page>.<rev>.txt             old page revisions
//! meta/<ns>/<page>.json                   optional metadata overrides
//! media/<ns>/<file>                       current media files
//! media_attic/<ns>/<name>.<rev>.<ext>     old media revisions
//! changes.log                             JSON-lines change log
//! ```
//!
//! All timestamps are unix seconds.

pub mod fs;
pub mod media;
#[cfg(test)]
pub mod memory;
pub mod urls;

use crate::config::SiteConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Records
// ============================================================================

/// Structured page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// First heading of the page.
    pub title: Option<String>,
    /// Plain-text abstract of the page.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Subject tags.
    pub subject: Vec<String>,
    /// Last modification recorded by the wiki.
    pub modified: Option<i64>,
}

/// Account profile from the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub login: String,
    pub name: String,
}

/// Kind of change recorded in the change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Edit,
    Minor,
    Delete,
    Revert,
}

/// One raw entry produced by a source selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: String,
    #[serde(default, rename = "media")]
    pub is_media: bool,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, rename = "user")]
    pub author: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ChangeKind>,
}

impl ChangeRecord {
    /// A page record carrying only its id (listings, search hits).
    pub fn page(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_media: false,
            date: None,
            summary: None,
            author: None,
            kind: None,
        }
    }
}

/// Change-log query filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentsFilter {
    /// Drop entries whose current file no longer exists.
    pub skip_deleted: bool,
    /// Drop minor edits.
    pub skip_minors: bool,
    /// Keep only page creations.
    pub only_creation: bool,
    /// Media changes only.
    pub media_only: bool,
    /// Media and page changes interleaved by date.
    pub media_mixed: bool,
}

/// A page found by a namespace listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub id: String,
    pub mtime: i64,
}

// ============================================================================
// Capabilities
// ============================================================================

/// Page id -> structured metadata.
pub trait MetadataStore: Send + Sync {
    fn metadata(&self, id: &str) -> Result<Option<Metadata>>;
}

/// Raw page text, revisions and file times.
pub trait ContentStore: Send + Sync {
    /// Page source at a revision, or the current source for `None`.
    fn page_text(&self, id: &str, rev: Option<i64>) -> Result<Option<String>>;

    /// Modification time of the current page file.
    fn page_mtime(&self, id: &str) -> Option<i64>;

    /// Modification time of the current media file.
    fn media_mtime(&self, id: &str) -> Option<i64>;

    /// Newest stored revision strictly older than `before`.
    fn previous_revision(&self, id: &str, is_media: bool, before: i64) -> Result<Option<i64>>;

    /// File holding a media revision, or the current file for `None`.
    fn media_path(&self, id: &str, rev: Option<i64>) -> Option<PathBuf>;

    /// Pages directly inside `ns` (no sub-namespaces).
    fn list_namespace(&self, ns: &str) -> Result<Vec<PageEntry>>;
}

/// Page id (+ revision) -> XHTML.
pub trait PageRenderer: Send + Sync {
    fn render(&self, id: &str, rev: Option<i64>) -> Result<Option<String>>;
}

/// Recent-changes queries.
pub trait ChangeLog: Send + Sync {
    /// At most `limit` entries, newest first, one per id.
    ///
    /// Entries rejected by `visible` do not count against `limit`.
    fn recent(
        &self,
        limit: usize,
        namespace: Option<&str>,
        filter: RecentsFilter,
        visible: &dyn Fn(&ChangeRecord) -> bool,
    ) -> Result<Vec<ChangeRecord>>;
}

/// Full-text search.
pub trait SearchIndex: Send + Sync {
    /// Matching page ids, most relevant first.
    fn search(&self, query: &str) -> Result<Vec<String>>;
}

/// Account lookup.
pub trait UserDirectory: Send + Sync {
    fn user(&self, login: &str) -> Result<Option<UserProfile>>;
}

/// Read permissions.
pub trait Acl: Send + Sync {
    /// Whether `user` (`None` when anonymous) may read `id`.
    ///
    /// Media is checked against its namespace scope, `ns:*`.
    fn can_read(&self, id: &str, user: Option<&str>) -> bool;
}

/// Every page is readable by everyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Acl for AllowAll {
    fn can_read(&self, _id: &str, _user: Option<&str>) -> bool {
        true
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Every collaborator the feed pipeline needs.
#[derive(Clone)]
pub struct Wiki {
    pub meta: Arc<dyn MetadataStore>,
    pub content: Arc<dyn ContentStore>,
    pub renderer: Arc<dyn PageRenderer>,
    pub changes: Arc<dyn ChangeLog>,
    pub search: Arc<dyn SearchIndex>,
    pub users: Arc<dyn UserDirectory>,
    pub acl: Arc<dyn Acl>,
}

impl Wiki {
    /// Filesystem-backed collaborators for `config`.
    pub fn open(config: &SiteConfig) -> Result<Self> {
        let layout = fs::Layout::new(&config.wiki.data_dir);
        let pages = Arc::new(fs::FsPages::new(layout.clone()));
        let users: Arc<dyn UserDirectory> = if config.users.enable {
            Arc::new(fs::AuthFile::load(&config.users.file)?)
        } else {
            Arc::new(fs::AuthFile::default())
        };

        Ok(Self {
            meta: pages.clone(),
            content: pages.clone(),
            renderer: Arc::new(fs::MarkdownRenderer::new(pages, config.site.base_path())),
            changes: Arc::new(fs::FsChangeLog::new(layout.clone())),
            search: Arc::new(fs::FsSearch::new(layout)),
            users,
            acl: Arc::new(AllowAll),
        })
    }
}
