//! In-memory collaborators for tests.

use crate::core::id::{in_namespace, namespace_of};
use crate::wiki::fs::render_markdown;
use crate::wiki::{
    Acl, ChangeKind, ChangeLog, ChangeRecord, ContentStore, Metadata, MetadataStore, PageEntry,
    PageRenderer, RecentsFilter, SearchIndex, UserDirectory, UserProfile, Wiki,
};
use anyhow::Result;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Page {
    text: Option<String>,
    mtime: Option<i64>,
    revisions: BTreeMap<i64, String>,
}

#[derive(Debug, Default)]
struct Media {
    path: Option<PathBuf>,
    mtime: Option<i64>,
    revisions: BTreeMap<i64, PathBuf>,
}

/// A wiki held in maps. Source queries are counted in `queries`.
#[derive(Debug, Default)]
pub struct MemoryWiki {
    pages: FxHashMap<String, Page>,
    media: FxHashMap<String, Media>,
    meta: FxHashMap<String, Metadata>,
    /// Newest first.
    changes: Vec<ChangeRecord>,
    hits: Vec<String>,
    users: FxHashMap<String, UserProfile>,
    /// Id -> the only login allowed to read it.
    owners: FxHashMap<String, String>,
    pub queries: AtomicUsize,
}

impl MemoryWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, id: &str, text: &str, mtime: i64) -> Self {
        let page = self.pages.entry(id.into()).or_default();
        page.text = Some(text.into());
        page.mtime = Some(mtime);
        self
    }

    pub fn with_revision(mut self, id: &str, rev: i64, text: &str) -> Self {
        self.pages
            .entry(id.into())
            .or_default()
            .revisions
            .insert(rev, text.into());
        self
    }

    pub fn with_meta(mut self, id: &str, meta: Metadata) -> Self {
        self.meta.insert(id.into(), meta);
        self
    }

    pub fn with_media(mut self, id: &str, path: PathBuf, mtime: i64) -> Self {
        let media = self.media.entry(id.into()).or_default();
        media.path = Some(path);
        media.mtime = Some(mtime);
        self
    }

    pub fn with_media_revision(mut self, id: &str, rev: i64, path: PathBuf) -> Self {
        self.media
            .entry(id.into())
            .or_default()
            .revisions
            .insert(rev, path);
        self
    }

    /// Record a change; call oldest first.
    pub fn with_change(mut self, record: ChangeRecord) -> Self {
        self.changes.insert(0, record);
        self
    }

    pub fn with_hits(mut self, ids: &[&str]) -> Self {
        self.hits = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_user(mut self, login: &str, name: &str) -> Self {
        self.users.insert(
            login.into(),
            UserProfile {
                login: login.into(),
                name: name.into(),
            },
        );
        self
    }

    /// Restrict `id` to `login`.
    pub fn with_owner(mut self, id: &str, login: &str) -> Self {
        self.owners.insert(id.into(), login.into());
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Bundle sharing this instance as every collaborator.
    pub fn into_wiki(self) -> (Arc<Self>, Wiki) {
        let shared = Arc::new(self);
        let wiki = Wiki {
            meta: shared.clone(),
            content: shared.clone(),
            renderer: shared.clone(),
            changes: shared.clone(),
            search: shared.clone(),
            users: shared.clone(),
            acl: shared.clone(),
        };
        (shared, wiki)
    }
}

impl MetadataStore for MemoryWiki {
    fn metadata(&self, id: &str) -> Result<Option<Metadata>> {
        Ok(self.meta.get(id).cloned())
    }
}

impl ContentStore for MemoryWiki {
    fn page_text(&self, id: &str, rev: Option<i64>) -> Result<Option<String>> {
        let Some(page) = self.pages.get(id) else {
            return Ok(None);
        };
        Ok(match rev {
            Some(rev) => page.revisions.get(&rev).cloned(),
            None => page.text.clone(),
        })
    }

    fn page_mtime(&self, id: &str) -> Option<i64> {
        self.pages.get(id)?.mtime
    }

    fn media_mtime(&self, id: &str) -> Option<i64> {
        self.media.get(id)?.mtime
    }

    fn previous_revision(&self, id: &str, is_media: bool, before: i64) -> Result<Option<i64>> {
        let revs: Vec<i64> = if is_media {
            self.media
                .get(id)
                .map(|m| m.revisions.keys().copied().collect())
                .unwrap_or_default()
        } else {
            self.pages
                .get(id)
                .map(|p| p.revisions.keys().copied().collect())
                .unwrap_or_default()
        };
        Ok(revs.into_iter().filter(|rev| *rev < before).max())
    }

    fn media_path(&self, id: &str, rev: Option<i64>) -> Option<PathBuf> {
        let media = self.media.get(id)?;
        match rev {
            Some(rev) => media.revisions.get(&rev).cloned(),
            None => media.path.clone(),
        }
    }

    fn list_namespace(&self, ns: &str) -> Result<Vec<PageEntry>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pages
            .iter()
            .filter(|(id, page)| page.text.is_some() && namespace_of(id) == ns)
            .map(|(id, page)| PageEntry {
                id: id.clone(),
                mtime: page.mtime.unwrap_or(0),
            })
            .collect())
    }
}

impl PageRenderer for MemoryWiki {
    fn render(&self, id: &str, rev: Option<i64>) -> Result<Option<String>> {
        Ok(self.page_text(id, rev)?.map(|text| render_markdown(&text, "/")))
    }
}

impl ChangeLog for MemoryWiki {
    fn recent(
        &self,
        limit: usize,
        namespace: Option<&str>,
        filter: RecentsFilter,
        visible: &dyn Fn(&ChangeRecord) -> bool,
    ) -> Result<Vec<ChangeRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let mut seen = FxHashSet::default();
        Ok(self
            .changes
            .iter()
            .filter(|r| {
                if filter.media_only {
                    r.is_media
                } else {
                    filter.media_mixed || !r.is_media
                }
            })
            .filter(|r| !(filter.skip_minors && r.kind == Some(ChangeKind::Minor)))
            .filter(|r| !filter.only_creation || r.kind == Some(ChangeKind::Create))
            .filter(|r| namespace.is_none_or(|ns| in_namespace(&r.id, ns)))
            .filter(|r| seen.insert((r.is_media, r.id.clone())))
            .filter(|r| visible(*r))
            .take(limit)
            .cloned()
            .collect())
    }
}

impl SearchIndex for MemoryWiki {
    fn search(&self, _query: &str) -> Result<Vec<String>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.clone())
    }
}

impl UserDirectory for MemoryWiki {
    fn user(&self, login: &str) -> Result<Option<UserProfile>> {
        Ok(self.users.get(login).cloned())
    }
}

impl Acl for MemoryWiki {
    fn can_read(&self, id: &str, user: Option<&str>) -> bool {
        self.owners
            .get(id)
            .is_none_or(|owner| user == Some(owner.as_str()))
    }
}
