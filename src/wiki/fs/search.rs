//! Full-text search over current page sources.
//!
//! Query syntax: whitespace-separated words, all of which must occur
//! (case-insensitive); `-word` excludes pages containing `word`;
//! `@ns` restricts hits to a namespace.

use super::Layout;
use crate::core::id::{clean_id, in_namespace};
use crate::wiki::SearchIndex;
use anyhow::Result;
use jwalk::WalkDir;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FsSearch {
    layout: Layout,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Query {
    include: Vec<String>,
    exclude: Vec<String>,
    namespace: Option<String>,
}

impl Query {
    fn parse(raw: &str) -> Self {
        let mut query = Self::default();
        for word in raw.split_whitespace() {
            let word = word.to_lowercase();
            if let Some(ns) = word.strip_prefix('@') {
                query.namespace = Some(clean_id(ns, false));
            } else if let Some(excluded) = word.strip_prefix('-') {
                if !excluded.is_empty() {
                    query.exclude.push(excluded.to_string());
                }
            } else {
                query.include.push(word);
            }
        }
        query
    }

    /// Occurrences of the included words, `None` when the page doesn't match.
    fn score(&self, text: &str) -> Option<usize> {
        let text = text.to_lowercase();
        if self.exclude.iter().any(|word| text.contains(word.as_str())) {
            return None;
        }
        self.include.iter().try_fold(0, |total, word| {
            match text.matches(word.as_str()).count() {
                0 => None,
                n => Some(total + n),
            }
        })
    }
}

impl FsSearch {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    fn page_files(&self) -> Vec<PathBuf> {
        WalkDir::new(self.layout.pages_dir())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .collect()
    }
}

impl SearchIndex for FsSearch {
    fn search(&self, raw: &str) -> Result<Vec<String>> {
        let query = Query::parse(raw);
        if query.include.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<(usize, String)> = self
            .page_files()
            .par_iter()
            .filter_map(|path| {
                let id = self.layout.page_id(path)?;
                if let Some(ns) = &query.namespace
                    && !in_namespace(&id, ns)
                {
                    return None;
                }
                let text = fs::read_to_string(path).ok()?;
                Some((query.score(&text)?, id))
            })
            .collect();

        hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(hits.into_iter().map(|(_, id)| id).collect())
    }
}
