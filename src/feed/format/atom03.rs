//! Atom 0.3 writer.

use super::{FeedDocument, GENERATOR};
use super::xml::XmlWriter;
use crate::utils::date::unix_to_rfc3339;
use anyhow::Result;

const NS_ATOM03: &str = "http://purl.org/atom/ns#";

pub fn render(doc: &FeedDocument) -> Result<String> {
    let meta = &doc.meta;
    let mut attrs = vec![("version", "0.3"), ("xmlns", NS_ATOM03)];
    if !meta.language.is_empty() {
        attrs.push(("xml:lang", meta.language.as_str()));
    }

    let mut w = XmlWriter::new()?;
    w.start("feed", &attrs)?;
    w.text_element("title", &[], &meta.title)?;
    w.text_element("tagline", &[], &meta.description)?;
    w.empty(
        "link",
        &[("rel", "alternate"), ("type", "text/html"), ("href", meta.link.as_str())],
    )?;
    w.text_element("id", &[], &meta.link)?;
    w.text_element("modified", &[], &unix_to_rfc3339(doc.updated()))?;
    w.text_element("generator", &[], GENERATOR)?;

    for item in &doc.items {
        w.start("entry", &[])?;
        w.text_element("title", &[], &item.title)?;
        w.empty(
            "link",
            &[("rel", "alternate"), ("type", "text/html"), ("href", item.link.as_str())],
        )?;
        if let Some(date) = item.date {
            let date = unix_to_rfc3339(date);
            w.text_element("created", &[], &date)?;
            w.text_element("issued", &[], &date)?;
            w.text_element("modified", &[], &date)?;
        }
        w.text_element("id", &[], &item.link)?;
        w.start("author", &[])?;
        w.text_element("name", &[], &item.author)?;
        w.text_element("email", &[], &item.author_email)?;
        w.end("author")?;
        w.text_element(
            "summary",
            &[("type", "text/html"), ("mode", "escaped")],
            &item.description,
        )?;
        w.end("entry")?;
    }

    w.end("feed")?;
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_shape() {
        let xml = render(&document()).unwrap();
        assert!(xml.contains("<feed version=\"0.3\" xmlns=\"http://purl.org/atom/ns#\" xml:lang=\"en\">"));
        assert!(xml.contains("<tagline>Changes &amp; more</tagline>"));
        assert!(xml.contains("<modified>2024-06-14T21:20:00Z</modified>"));
        assert_eq!(xml.matches("<entry>").count(), 2);
        assert_eq!(xml.matches("<issued>").count(), 1);
        assert!(xml.contains("<email>alice@undisclosed.example.com</email>"));
        assert!(xml.contains("<summary type=\"text/html\" mode=\"escaped\">"));
    }
}
