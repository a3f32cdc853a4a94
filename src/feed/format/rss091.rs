//! RSS 0.91 writer.

use super::FeedDocument;
use super::xml::XmlWriter;
use crate::utils::date::unix_to_rfc2822;
use anyhow::Result;

pub fn render(doc: &FeedDocument) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start("rss", &[("version", "0.91")])?;
    w.start("channel", &[])?;

    let meta = &doc.meta;
    w.text_element("title", &[], &meta.title)?;
    w.text_element("link", &[], &meta.link)?;
    w.text_element("description", &[], &meta.description)?;
    if !meta.language.is_empty() {
        w.text_element("language", &[], &meta.language)?;
    }
    if let Some(generated) = meta.generated {
        w.text_element("lastBuildDate", &[], &unix_to_rfc2822(generated))?;
    }

    for item in &doc.items {
        w.start("item", &[])?;
        w.text_element("title", &[], &item.title)?;
        w.text_element("link", &[], &item.link)?;
        w.text_element("description", &[], &item.description)?;
        w.end("item")?;
    }

    w.end("channel")?;
    w.end("rss")?;
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_shape() {
        let xml = render(&document()).unwrap();
        assert!(xml.contains("<rss version=\"0.91\">"));
        assert!(xml.contains("<lastBuildDate>Sat, 15 Jun 2024 14:30:45 GMT</lastBuildDate>"));
        assert_eq!(xml.matches("<item>").count(), 2);
        assert!(xml.contains("<description>&lt;p"));
        assert!(xml.contains("Body &amp;amp; text"));
    }
}
