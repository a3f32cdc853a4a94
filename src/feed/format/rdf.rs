//! RSS 1.0 (RDF) writer.

use super::FeedDocument;
use super::xml::XmlWriter;
use crate::utils::date::unix_to_rfc3339;
use anyhow::Result;

const NS_RSS: &str = "http://purl.org/rss/1.0/";
const NS_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";

pub fn render(doc: &FeedDocument) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start(
        "rdf:RDF",
        &[("xmlns", NS_RSS), ("xmlns:rdf", NS_RDF), ("xmlns:dc", NS_DC)],
    )?;

    let meta = &doc.meta;
    w.start("channel", &[("rdf:about", meta.self_link.as_str())])?;
    w.text_element("title", &[], &meta.title)?;
    w.text_element("description", &[], &meta.description)?;
    w.text_element("link", &[], &meta.link)?;
    if let Some(generated) = meta.generated {
        w.text_element("dc:date", &[], &unix_to_rfc3339(generated))?;
    }
    if !meta.language.is_empty() {
        w.text_element("dc:language", &[], &meta.language)?;
    }
    w.start("items", &[])?;
    w.start("rdf:Seq", &[])?;
    for item in &doc.items {
        w.empty("rdf:li", &[("rdf:resource", item.link.as_str())])?;
    }
    w.end("rdf:Seq")?;
    w.end("items")?;
    w.end("channel")?;

    for item in &doc.items {
        w.start("item", &[("rdf:about", item.link.as_str())])?;
        w.text_element("dc:format", &[], "text/html")?;
        if let Some(date) = item.date {
            w.text_element("dc:date", &[], &unix_to_rfc3339(date))?;
        }
        w.text_element("dc:creator", &[], &item.author)?;
        for subject in &item.categories {
            w.text_element("dc:subject", &[], subject)?;
        }
        w.text_element("title", &[], &item.title)?;
        w.text_element("link", &[], &item.link)?;
        w.text_element("description", &[], &item.description)?;
        w.end("item")?;
    }

    w.end("rdf:RDF")?;
    w.finish()
}
