//! Item descriptions.
//!
//! | `content`            | page                                  | media                          |
//! |----------------------|---------------------------------------|--------------------------------|
//! | `diff` / `htmldiff`  | diff against the previous revision    | previous vs current preview    |
//! | `html`               | rendered page, feed-safe              | inline preview                 |
//! | `abstract`           | metadata abstract                     | inline preview                 |
//!
//! Missing content yields an empty description.

use super::ItemContext;
use crate::config::ItemContent;
use crate::debug;
use crate::diff;
use crate::feed::error::FeedError;
use crate::utils::html::{escape, escape_attr};
use crate::wiki::media::{DIFF_PREVIEW_SIZE, PREVIEW_SIZE, preview_size};
use crate::wiki::{ChangeRecord, Metadata};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Header label of the right-hand side of diffs.
const CURRENT: &str = "current";

pub fn build(ctx: &ItemContext, record: &ChangeRecord, meta: Option<&Metadata>, date: Option<i64>) -> String {
    match (ctx.options.item_content, record.is_media) {
        (ItemContent::Diff | ItemContent::HtmlDiff, true) => media_diff(ctx, &record.id, date),
        (ItemContent::Diff | ItemContent::HtmlDiff, false) => page_diff(ctx, &record.id, date),
        (ItemContent::Html | ItemContent::Abstract, true) => media_preview(ctx, &record.id),
        (ItemContent::Html, false) => page_html(ctx, &record.id, date),
        (ItemContent::Abstract, false) => meta
            .and_then(|m| m.abstract_text.clone())
            .unwrap_or_default(),
    }
}

fn missing(id: &str) {
    debug!("feed"; "{}", FeedError::MissingContent(id.to_string()));
}

// ============================================================================
// Media
// ============================================================================

/// `<img>` of the current file scaled to the preview box, or empty.
fn media_preview(ctx: &ItemContext, id: &str) -> String {
    let Some(src) = current_image_src(ctx, id, PREVIEW_SIZE) else {
        return String::new();
    };
    format!("<img src=\"{src}\" alt=\"{}\" />", escape_attr(id))
}

fn current_image_src(ctx: &ItemContext, id: &str, max: u32) -> Option<String> {
    let Some(path) = ctx.wiki.content.media_path(id, None) else {
        missing(id);
        return None;
    };
    let (w, h) = preview_size(id, &path, max)?;
    let mut params = vec![("w", w.to_string()), ("h", h.to_string())];
    if let Some(mtime) = ctx.wiki.content.media_mtime(id) {
        params.push(("t", mtime.to_string()));
    }
    Some(ctx.urls.media_file(id, &params))
}

/// Previous revision and current file side by side.
fn media_diff(ctx: &ItemContext, id: &str, date: Option<i64>) -> String {
    let Some(src_r) = current_image_src(ctx, id, DIFF_PREVIEW_SIZE) else {
        return String::new();
    };

    let rev = previous_revision(ctx, id, true, date);
    let src_l = rev
        .and_then(|rev| {
            let path = ctx.wiki.content.media_path(id, Some(rev))?;
            let (w, h) = preview_size(id, &path, DIFF_PREVIEW_SIZE)?;
            Some(ctx.urls.media_file(
                id,
                &[("rev", rev.to_string()), ("w", w.to_string()), ("h", h.to_string())],
            ))
        })
        .unwrap_or_default();

    format!(
        "<table><tr><th width=\"50%\">{}</th><th width=\"50%\">{CURRENT}</th></tr>\
         <tr align=\"center\"><td><img src=\"{src_l}\" alt=\"\" /></td>\
         <td><img src=\"{src_r}\" alt=\"{}\" /></td></tr></table>",
        rev_label(rev),
        escape_attr(id)
    )
}

// ============================================================================
// Pages
// ============================================================================

fn previous_revision(ctx: &ItemContext, id: &str, is_media: bool, date: Option<i64>) -> Option<i64> {
    ctx.wiki
        .content
        .previous_revision(id, is_media, date.unwrap_or(i64::MAX))
        .inspect_err(|e| debug!("feed"; "revisions of {} unavailable: {:#}", id, e))
        .ok()
        .flatten()
}

fn rev_label(rev: Option<i64>) -> String {
    rev.map(|r| r.to_string()).unwrap_or_default()
}

/// Diff from the previous revision (or an empty document) to the current text.
fn page_diff(ctx: &ItemContext, id: &str, date: Option<i64>) -> String {
    let content = &ctx.wiki.content;
    let rev = previous_revision(ctx, id, false, date);
    let old = rev
        .and_then(|rev| content.page_text(id, Some(rev)).ok().flatten())
        .unwrap_or_default();
    let new = match content.page_text(id, None) {
        Ok(Some(text)) => text,
        Ok(None) => {
            missing(id);
            String::new()
        }
        Err(e) => {
            debug!("feed"; "reading {} failed: {:#}", id, e);
            String::new()
        }
    };

    if ctx.options.item_content == ItemContent::HtmlDiff {
        format!(
            "<table><tr><th colspan=\"2\" width=\"50%\">{}</th>\
             <th colspan=\"2\" width=\"50%\">{CURRENT}</th></tr>{}</table>",
            rev_label(rev),
            diff::table(&old, &new)
        )
    } else {
        format!("<pre>\n{}\n</pre>", escape(&diff::unified(&old, &new)))
    }
}

/// Rendered page made safe for feed readers.
fn page_html(ctx: &ItemContext, id: &str, date: Option<i64>) -> String {
    let current = date.is_none() || ctx.wiki.content.page_mtime(id) == date;
    let rev = if current { None } else { date };

    let rendered = match ctx.wiki.renderer.render(id, rev) {
        // the newest change lives only in the current file
        Ok(None) if rev.is_some() && is_newest(ctx, id, date) => ctx.wiki.renderer.render(id, None),
        other => other,
    };
    let html = match rendered {
        Ok(Some(html)) => html,
        Ok(None) => {
            missing(id);
            return String::new();
        }
        Err(e) => {
            debug!("feed"; "rendering {} failed: {:#}", id, e);
            return String::new();
        }
    };

    let html = strip_toc(&html);
    let html = align_images(&html);
    if ctx.config.site.canonical {
        html
    } else {
        absolutize(&html, &ctx.config.site.base_path(), ctx.urls.base())
    }
}

/// Whether no stored revision is as new as `date`.
fn is_newest(ctx: &ItemContext, id: &str, date: Option<i64>) -> bool {
    let Some(date) = date else {
        return true;
    };
    ctx.wiki
        .content
        .previous_revision(id, false, i64::MAX)
        .is_ok_and(|latest| latest.is_none_or(|rev| rev < date))
}

fn strip_toc(html: &str) -> String {
    static RE_TOC: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<!-- TOC START -->.*<!-- TOC END -->").unwrap());
    RE_TOC.replace_all(html, "").into_owned()
}

fn align_images(html: &str) -> String {
    static RE_LEFT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(<img [^>]*?class="medialeft")"#).unwrap());
    static RE_RIGHT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(<img [^>]*?class="mediaright")"#).unwrap());

    let html = RE_LEFT.replace_all(html, r#"$1 align="left""#);
    RE_RIGHT
        .replace_all(&html, r#"$1 align="right""#)
        .into_owned()
}

/// Rewrite `href`/`src` values starting with the base path to the base URL.
fn absolutize(html: &str, base_path: &str, base_url: &str) -> String {
    let Ok(re) = Regex::new(&format!(
        r#"(<a href|<img src)="{}"#,
        regex::escape(base_path)
    )) else {
        return html.to_string();
    };
    re.replace_all(html, |caps: &Captures| format!("{}=\"{base_url}", &caps[1]))
        .into_owned()
}
