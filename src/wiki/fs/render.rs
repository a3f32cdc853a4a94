//! Markdown page rendering.
//!
//! Produces the XHTML the wiki would show for a page:
//! - headings get anchors, and pages with three or more headings get a
//!   table of contents between `<!-- TOC START -->` / `<!-- TOC END -->`
//! - bare link targets (`[text](ns:page)`) become wiki page links under
//!   the site base path
//! - images titled `left` / `right` get the `medialeft` / `mediaright` class

use super::FsPages;
use crate::core::id::clean_id;
use crate::utils::html::escape;
use crate::wiki::{ContentStore, PageRenderer};
use anyhow::Result;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::{Arc, LazyLock};

/// Minimum number of headings before a TOC is emitted.
const TOC_MIN_HEADINGS: usize = 3;

pub struct MarkdownRenderer {
    pages: Arc<FsPages>,
    base_path: String,
}

impl MarkdownRenderer {
    pub fn new(pages: Arc<FsPages>, base_path: String) -> Self {
        Self { pages, base_path }
    }
}

impl PageRenderer for MarkdownRenderer {
    fn render(&self, id: &str, rev: Option<i64>) -> Result<Option<String>> {
        Ok(self
            .pages
            .page_text(id, rev)?
            .map(|text| render_markdown(&text, &self.base_path)))
    }
}

struct TocEntry {
    level: HeadingLevel,
    title: String,
    anchor: String,
}

/// Render Markdown to XHTML with wiki conventions.
pub fn render_markdown(text: &str, base_path: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut events: Vec<Event> = Parser::new_ext(text, options)
        .map(|event| wiki_link(event, base_path))
        .collect();
    let toc = anchor_headings(&mut events);

    let mut out = String::with_capacity(text.len() * 3 / 2);
    if toc.len() >= TOC_MIN_HEADINGS {
        push_toc(&mut out, &toc);
    }
    html::push_html(&mut out, events.into_iter());
    align_images(&out)
}

/// Point bare link targets at wiki pages.
fn wiki_link<'a>(event: Event<'a>, base_path: &str) -> Event<'a> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_wiki_target(&dest_url) => {
            let target = format!("{base_path}doku.php?id={}", clean_id(&dest_url, false));
            Event::Start(Tag::Link {
                link_type,
                dest_url: CowStr::from(target),
                title,
                id,
            })
        }
        other => other,
    }
}

fn is_wiki_target(dest: &str) -> bool {
    !dest.is_empty()
        && !dest.contains("://")
        && !dest.starts_with(['/', '#', '?', '.'])
        && !dest.starts_with("mailto:")
}

/// Give every heading an anchor and collect the TOC.
fn anchor_headings(events: &mut [Event]) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut used = FxHashSet::default();

    let mut i = 0;
    while i < events.len() {
        let Event::Start(Tag::Heading { level, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let level = *level;

        let mut title = String::new();
        let mut end = i + 1;
        while end < events.len() && !matches!(events[end], Event::End(TagEnd::Heading(_))) {
            if let Event::Text(t) | Event::Code(t) = &events[end] {
                title.push_str(t);
            }
            end += 1;
        }

        let anchor = unique_anchor(&title, &mut used);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor.clone()));
        }
        toc.push(TocEntry {
            level,
            title,
            anchor,
        });
        i = end + 1;
    }
    toc
}

fn unique_anchor(title: &str, used: &mut FxHashSet<String>) -> String {
    let base = clean_id(title, true).replace([':', '.'], "_");
    let base = if base.is_empty() { "section".to_string() } else { base };

    let mut anchor = base.clone();
    let mut n = 1;
    while !used.insert(anchor.clone()) {
        anchor = format!("{base}{n}");
        n += 1;
    }
    anchor
}

fn push_toc(out: &mut String, toc: &[TocEntry]) {
    out.push_str("<!-- TOC START -->\n<div id=\"dw__toc\">\n<h3>Table of Contents</h3>\n<ul>\n");
    for entry in toc {
        out.push_str(&format!(
            "<li class=\"level{}\"><a href=\"#{}\">{}</a></li>\n",
            entry.level as usize,
            entry.anchor,
            escape(&entry.title)
        ));
    }
    out.push_str("</ul>\n</div>\n<!-- TOC END -->\n");
}

/// `title="left"` / `title="right"` on images becomes a media class.
fn align_images(html: &str) -> String {
    static RE_ALIGN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"<img ([^>]*?)title="(left|right)""#).unwrap());
    RE_ALIGN
        .replace_all(html, r#"<img ${1}class="media${2}""#)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::fs::Layout;
    use std::fs;

    #[test]
    fn test_toc_only_with_enough_headings() {
        let two = render_markdown("# A\n\n## B\n", "/");
        assert!(!two.contains("TOC START"));
        assert!(two.contains("<h1 id=\"a\">A</h1>"));

        let three = render_markdown("# Intro\n\n## Usage\n\n## Usage\n", "/");
        assert!(three.starts_with("<!-- TOC START -->"));
        assert!(three.contains("<a href=\"#usage1\">Usage</a>"));
        assert!(three.contains("<h2 id=\"usage1\">Usage</h2>"));
    }

    #[test]
    fn test_wiki_links() {
        let html = render_markdown("[Start](Wiki:Start) [ext](https://x.org) [abs](/a)", "/wiki/");
        assert!(html.contains("href=\"/wiki/doku.php?id=wiki:start\""));
        assert!(html.contains("href=\"https://x.org\""));
        assert!(html.contains("href=\"/a\""));
    }

    #[test]
    fn test_image_alignment_class() {
        let html = render_markdown("![logo](/wiki/logo.png \"left\")", "/wiki/");
        assert!(html.contains("<img src=\"/wiki/logo.png\" alt=\"logo\" class=\"medialeft\""));
    }

    #[test]
    fn test_render_revision() {
        let dir = tempfile::TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let attic = layout.attic_file("p", 10);
        fs::create_dir_all(attic.parent().unwrap()).unwrap();
        fs::write(attic, "old *text*").unwrap();

        let renderer = MarkdownRenderer::new(Arc::new(FsPages::new(layout)), "/".into());
        assert_eq!(
            renderer.render("p", Some(10)).unwrap().as_deref(),
            Some("<p>old <em>text</em></p>\n")
        );
        assert!(renderer.render("p", None).unwrap().is_none());
    }
}
