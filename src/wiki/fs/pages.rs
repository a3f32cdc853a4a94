//! Page and media files, revisions and metadata.

use super::Layout;
use crate::freshness::mtime::mtime_secs;
use crate::wiki::{ContentStore, Metadata, MetadataStore, PageEntry};
use anyhow::{Context, Result};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Abstracts longer than this are cut and end in an ellipsis.
const ABSTRACT_LEN: usize = 500;

/// Pages and media under one data directory.
#[derive(Debug, Clone)]
pub struct FsPages {
    layout: Layout,
}

impl FsPages {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    fn read_optional(path: &std::path::Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

impl MetadataStore for FsPages {
    fn metadata(&self, id: &str) -> Result<Option<Metadata>> {
        let stored = Self::read_optional(&self.layout.meta_file(id))?
            .map(|json| serde_json::from_str::<Metadata>(&json))
            .transpose()
            .with_context(|| format!("invalid metadata for {id}"))?;
        let text = Self::read_optional(&self.layout.page_file(id))?;

        if stored.is_none() && text.is_none() {
            return Ok(None);
        }

        let mut meta = stored.unwrap_or_default();
        if let Some(text) = &text {
            let derived = derive_metadata(text);
            meta.title = meta.title.or(derived.title);
            meta.abstract_text = meta.abstract_text.or(derived.abstract_text);
        }
        Ok(Some(meta))
    }
}

impl ContentStore for FsPages {
    fn page_text(&self, id: &str, rev: Option<i64>) -> Result<Option<String>> {
        let path = match rev {
            Some(rev) => self.layout.attic_file(id, rev),
            None => self.layout.page_file(id),
        };
        Self::read_optional(&path)
    }

    fn page_mtime(&self, id: &str) -> Option<i64> {
        mtime_secs(&self.layout.page_file(id))
    }

    fn media_mtime(&self, id: &str) -> Option<i64> {
        mtime_secs(&self.layout.media_file(id))
    }

    fn previous_revision(&self, id: &str, is_media: bool, before: i64) -> Result<Option<i64>> {
        Ok(self
            .layout
            .revisions(id, is_media)
            .into_iter()
            .filter(|rev| *rev < before)
            .max())
    }

    fn media_path(&self, id: &str, rev: Option<i64>) -> Option<PathBuf> {
        let path = match rev {
            Some(rev) => self.layout.media_attic_file(id, rev),
            None => self.layout.media_file(id),
        };
        path.is_file().then_some(path)
    }

    fn list_namespace(&self, ns: &str) -> Result<Vec<PageEntry>> {
        let dir = self.layout.namespace_dir(ns);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("failed to list {}", dir.display())),
        };

        let mut pages = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(id) = self.layout.page_id(&path) else {
                continue;
            };
            let mtime = mtime_secs(&path).unwrap_or(0);
            pages.push(PageEntry { id, mtime });
        }
        Ok(pages)
    }
}

/// Title (first heading) and abstract (leading plain text) of a page.
pub(super) fn derive_metadata(text: &str) -> Metadata {
    let mut title: Option<String> = None;
    let mut in_heading = false;
    let mut heading = String::new();
    let mut plain = String::new();

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = title.is_none(),
            Event::End(TagEnd::Heading(_)) => {
                if in_heading && !heading.trim().is_empty() {
                    title = Some(heading.trim().to_string());
                }
                in_heading = false;
                plain.push('\n');
            }
            Event::Text(t) | Event::Code(t) => {
                if in_heading {
                    heading.push_str(&t);
                }
                plain.push_str(&t);
            }
            Event::SoftBreak | Event::HardBreak => plain.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item) => plain.push('\n'),
            _ => {}
        }
    }

    Metadata {
        title,
        abstract_text: abstract_of(&plain),
        ..Metadata::default()
    }
}

fn abstract_of(plain: &str) -> Option<String> {
    let plain = plain.trim();
    if plain.is_empty() {
        return None;
    }
    if plain.chars().count() <= ABSTRACT_LEN {
        return Some(plain.to_string());
    }
    let mut cut: String = plain.chars().take(ABSTRACT_LEN).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    Some(cut)
}
