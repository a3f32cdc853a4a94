//! Feed assembly and serialization.
//!
//! One writer per [`FeedFormat`]:
//!
//! | Format    | Writer                      |
//! |-----------|-----------------------------|
//! | RSS 0.91  | [`rss091`] (quick-xml)      |
//! | RSS 1.0   | [`rdf`] (quick-xml)         |
//! | RSS 2.0   | [`rss`] (`rss` crate)       |
//! | Atom 0.3  | [`atom03`] (quick-xml)      |
//! | Atom 1.0  | [`atom`] (`atom_syndication`) |
//!
//! Rendering is a pure function of the document: the same document always
//! serializes to the same bytes.

mod atom;
mod atom03;
mod rdf;
mod rss;
mod rss091;
mod xml;

use super::item::FeedItem;
use crate::config::FeedFormat;
use anyhow::Result;

const GENERATOR: &str = "wikifeed";

/// Channel-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: String,
    /// Site base URL.
    pub link: String,
    pub description: String,
    /// URL of the feed endpoint itself.
    pub self_link: String,
    pub language: String,
    /// Generation time, unix seconds.
    pub generated: Option<i64>,
}

/// A complete feed ready to serialize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    pub meta: FeedMeta,
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    pub fn new(meta: FeedMeta, items: Vec<FeedItem>) -> Self {
        Self { meta, items }
    }

    pub fn render(&self, format: FeedFormat) -> Result<String> {
        match format {
            FeedFormat::Rss091 => rss091::render(self),
            FeedFormat::Rss2 => rss::render(self),
            FeedFormat::Atom03 => atom03::render(self),
            FeedFormat::Atom1 => atom::render(self),
            FeedFormat::Rss1 => rdf::render(self),
        }
    }

    /// Newest item date, else the generation time, else the epoch.
    pub fn updated(&self) -> i64 {
        self.items
            .iter()
            .filter_map(|item| item.date)
            .max()
            .or(self.meta.generated)
            .unwrap_or(0)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn meta() -> FeedMeta {
        FeedMeta {
            title: "Test Wiki".into(),
            link: "https://wiki.example.com/".into(),
            description: "Changes & more".into(),
            self_link: "https://wiki.example.com/feed.php".into(),
            language: "en".into(),
            generated: Some(1_718_461_845),
        }
    }

    pub fn item(id: &str, date: Option<i64>) -> FeedItem {
        FeedItem {
            title: format!("{id} - fixed <typo>"),
            link: format!("https://wiki.example.com/doku.php?id={id}&do=diff"),
            description: "<p>Body &amp; text</p>".into(),
            author: "Alice".into(),
            author_email: "alice@undisclosed.example.com".into(),
            categories: vec!["ns".into()],
            date,
        }
    }

    pub fn document() -> FeedDocument {
        FeedDocument::new(
            meta(),
            vec![item("ns:a", Some(1_718_400_000)), item("ns:b", None)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    const ALL: [FeedFormat; 5] = [
        FeedFormat::Rss091,
        FeedFormat::Rss2,
        FeedFormat::Atom03,
        FeedFormat::Atom1,
        FeedFormat::Rss1,
    ];

    #[test]
    fn test_updated_fallbacks() {
        assert_eq!(document().updated(), 1_718_400_000);

        let mut doc = FeedDocument::new(meta(), vec![item("a", None)]);
        assert_eq!(doc.updated(), 1_718_461_845);
        doc.meta.generated = None;
        assert_eq!(doc.updated(), 0);
    }

    #[test]
    fn test_every_format_is_deterministic() {
        for format in ALL {
            let a = document().render(format).unwrap();
            let b = document().render(format).unwrap();
            assert_eq!(a, b, "{format}");
            assert!(a.starts_with("<?xml"), "{format}: {a}");
        }
    }

    #[test]
    fn test_every_format_escapes_text() {
        for format in ALL {
            let xml = document().render(format).unwrap();
            assert!(!xml.contains("<typo>"), "{format}");
            assert!(xml.contains("&lt;typo"), "{format}");
        }
    }

    #[test]
    fn test_empty_document_renders() {
        for format in ALL {
            let xml = FeedDocument::new(meta(), Vec::new()).render(format).unwrap();
            assert!(xml.contains("Test Wiki"), "{format}");
        }
    }
}
