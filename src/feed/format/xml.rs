//! Thin event writer over quick-xml for the hand-written formats.

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

pub struct XmlWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// Indented writer with the XML declaration already emitted.
    pub fn new() -> Result<Self> {
        let mut inner = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .context("Failed to write XML declaration")?;
        Ok(Self { inner })
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.extend_attributes(attrs.iter().copied());
        self.inner
            .write_event(Event::Start(elem))
            .with_context(|| format!("Failed to write <{name}>"))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .with_context(|| format!("Failed to write </{name}>"))
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.extend_attributes(attrs.iter().copied());
        self.inner
            .write_event(Event::Empty(elem))
            .with_context(|| format!("Failed to write <{name}/>"))
    }

    /// `<name attrs>text</name>`, text escaped.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .with_context(|| format!("Failed to write <{name}> text"))?;
        self.end(name)
    }

    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner().into_inner()).context("Feed XML is not UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_escaped_tree() {
        let mut w = XmlWriter::new().unwrap();
        w.start("root", &[("a", "x&y")]).unwrap();
        w.text_element("t", &[], "1 < 2").unwrap();
        w.empty("e", &[("href", "u")]).unwrap();
        w.end("root").unwrap();
        let xml = w.finish().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<root a=\"x&amp;y\">"));
        assert!(xml.contains("<t>1 &lt; 2</t>"));
        assert!(xml.contains("<e href=\"u\"/>"));
        assert!(xml.trim_end().ends_with("</root>"));
    }
}
