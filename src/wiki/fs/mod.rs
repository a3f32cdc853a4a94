//! Filesystem-backed collaborators.

mod changelog;
mod pages;
mod render;
mod search;
mod users;

pub use changelog::FsChangeLog;
pub use pages::FsPages;
pub use render::{MarkdownRenderer, render_markdown};
pub use search::FsSearch;
pub use users::AuthFile;

use crate::core::id::SEP;
use std::fs;
use std::path::{Path, PathBuf};

const PAGE_EXT: &str = "txt";

/// Paths of the repository layout under one data directory.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    pub fn page_file(&self, id: &str) -> PathBuf {
        with_suffix(&self.pages_dir().join(id_path(id)), &format!(".{PAGE_EXT}"))
    }

    pub fn attic_file(&self, id: &str, rev: i64) -> PathBuf {
        let path = self.root.join("attic").join(id_path(id));
        with_suffix(&path, &format!(".{rev}.{PAGE_EXT}"))
    }

    pub fn meta_file(&self, id: &str) -> PathBuf {
        with_suffix(&self.root.join("meta").join(id_path(id)), ".json")
    }

    pub fn media_file(&self, id: &str) -> PathBuf {
        self.root.join("media").join(id_path(id))
    }

    /// `ns:photo.png` at `rev` -> `media_attic/ns/photo.<rev>.png`
    pub fn media_attic_file(&self, id: &str, rev: i64) -> PathBuf {
        let path = self.root.join("media_attic").join(id_path(id));
        let (stem, ext) = split_ext(crate::core::id::name_of(id));
        let name = match ext {
            Some(ext) => format!("{stem}.{rev}.{ext}"),
            None => format!("{stem}.{rev}"),
        };
        path.with_file_name(name)
    }

    pub fn changes_log(&self) -> PathBuf {
        self.root.join("changes.log")
    }

    /// Directory holding the pages of namespace `ns`.
    pub fn namespace_dir(&self, ns: &str) -> PathBuf {
        if ns.is_empty() {
            self.pages_dir()
        } else {
            self.pages_dir().join(id_path(ns))
        }
    }

    /// Page id of a file under `pages/`.
    pub fn page_id(&self, path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXT) {
            return None;
        }
        let rel = path.strip_prefix(self.pages_dir()).ok()?.with_extension("");
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join(&SEP.to_string()))
    }

    /// Revision timestamps stored for an id, unordered.
    pub fn revisions(&self, id: &str, is_media: bool) -> Vec<i64> {
        let name = crate::core::id::name_of(id);
        let (dir, prefix, suffix) = if is_media {
            let dir = self.media_attic_file(id, 0);
            let (stem, ext) = split_ext(name);
            (dir, format!("{stem}."), ext.map(|e| format!(".{e}")).unwrap_or_default())
        } else {
            (self.attic_file(id, 0), format!("{name}."), format!(".{PAGE_EXT}"))
        };
        let Some(dir) = dir.parent() else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let file_name = file_name.to_str()?;
                file_name
                    .strip_prefix(prefix.as_str())?
                    .strip_suffix(suffix.as_str())?
                    .parse()
                    .ok()
            })
            .collect()
    }
}

fn id_path(id: &str) -> PathBuf {
    id.split(SEP).collect()
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

fn split_ext(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new(Path::new("/data"));
        assert_eq!(layout.page_file("a:b:c"), Path::new("/data/pages/a/b/c.txt"));
        assert_eq!(layout.attic_file("a:c", 42), Path::new("/data/attic/a/c.42.txt"));
        assert_eq!(layout.meta_file("c"), Path::new("/data/meta/c.json"));
        assert_eq!(layout.media_file("ns:x.png"), Path::new("/data/media/ns/x.png"));
        assert_eq!(
            layout.media_attic_file("ns:x.png", 7),
            Path::new("/data/media_attic/ns/x.7.png")
        );
        assert_eq!(layout.namespace_dir(""), Path::new("/data/pages"));
    }

    #[test]
    fn test_page_id_roundtrip() {
        let layout = Layout::new(Path::new("/data"));
        assert_eq!(layout.page_id(&layout.page_file("a:b:c")).as_deref(), Some("a:b:c"));
        assert_eq!(layout.page_id(Path::new("/data/pages/x.md")), None);
        assert_eq!(layout.page_id(Path::new("/other/x.txt")), None);
    }

    #[test]
    fn test_revisions() {
        let dir = tempfile::TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        for rev in [10, 20] {
            let path = layout.attic_file("ns:page", rev);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "old").unwrap();
        }
        fs::write(layout.attic_file("ns:pageother", 30), "x").unwrap();

        let mut revs = layout.revisions("ns:page", false);
        revs.sort_unstable();
        assert_eq!(revs, vec![10, 20]);

        let media = layout.media_attic_file("ns:pic.png", 5);
        fs::create_dir_all(media.parent().unwrap()).unwrap();
        fs::write(&media, "png").unwrap();
        assert_eq!(layout.revisions("ns:pic.png", true), vec![5]);
        assert!(layout.revisions("ns:none.png", true).is_empty());
    }
}
