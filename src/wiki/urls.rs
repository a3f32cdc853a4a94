//! Absolute wiki URLs.
//!
//! | Target        | Shape                                              |
//! |---------------|----------------------------------------------------|
//! | page view     | `<base>doku.php?id=<id>&<params>`                  |
//! | media manager | `<base>doku.php?do=media&<params>`                 |
//! | media file    | `<base>lib/exe/fetch.php?<params>&media=<id>`      |
//!
//! Ids keep their `:` separators; everything else outside the unreserved
//! set is percent-encoded.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left as-is in query keys and values.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':');

/// URL builder rooted at the site base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    base: String,
}

impl Urls {
    /// `base` must end with `/` (see `SiteInfoConfig::base_url`).
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Page view URL, `&`-separated (used in feed links).
    pub fn page(&self, id: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}doku.php?id={}", self.base, encode(id));
        append(&mut url, params, "&");
        url
    }

    /// Media manager URL, `&`-separated (used in feed links).
    pub fn media_manager(&self, params: &[(&str, String)]) -> String {
        let mut url = format!("{}doku.php?do=media", self.base);
        append(&mut url, params, "&");
        url
    }

    /// Media file URL, `&amp;`-separated for embedding in markup.
    pub fn media_file(&self, id: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}lib/exe/fetch.php?", self.base);
        for (key, value) in params {
            url.push_str(&encode(key));
            url.push('=');
            url.push_str(&encode(value));
            url.push_str("&amp;");
        }
        url.push_str("media=");
        url.push_str(&encode(id));
        url
    }

    /// Feed endpoint URL (the feed's self link).
    pub fn feed(&self) -> String {
        format!("{}feed.php", self.base)
    }
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY).to_string()
}

fn append(url: &mut String, params: &[(&str, String)], sep: &str) {
    for (key, value) in params {
        url.push_str(sep);
        url.push_str(&encode(key));
        url.push('=');
        url.push_str(&encode(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> Urls {
        Urls::new("https://wiki.example.com/")
    }

    #[test]
    fn test_page_url() {
        assert_eq!(
            urls().page("ns:start", &[("rev", "100".into()), ("do", "diff".into())]),
            "https://wiki.example.com/doku.php?id=ns:start&rev=100&do=diff"
        );
        assert_eq!(urls().page("start", &[]), "https://wiki.example.com/doku.php?id=start");
    }

    #[test]
    fn test_page_url_encodes() {
        assert_eq!(
            urls().page("a b&c", &[]),
            "https://wiki.example.com/doku.php?id=a%20b%26c"
        );
    }

    #[test]
    fn test_media_manager_url() {
        assert_eq!(
            urls().media_manager(&[("image", "ns:a.png".into()), ("ns", "ns".into())]),
            "https://wiki.example.com/doku.php?do=media&image=ns:a.png&ns=ns"
        );
    }

    #[test]
    fn test_media_file_url() {
        assert_eq!(
            urls().media_file("ns:a.png", &[("w", "10".into()), ("h", "5".into())]),
            "https://wiki.example.com/lib/exe/fetch.php?w=10&amp;h=5&amp;media=ns:a.png"
        );
        assert_eq!(urls().feed(), "https://wiki.example.com/feed.php");
    }
}
