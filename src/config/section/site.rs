//! `[site]` section configuration.
//!
//! Site-wide identity and rendering policy shared by every feed.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Wiki"
//! description = "Notes and documentation"
//! url = "https://wiki.example.com/"   # base URL, path is the base path
//! use_heading = true                  # first heading as item title
//! canonical = false                   # rewrite relative links in html content
//! hidden_pages = "^wiki:"             # never list matching ids
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

/// Site metadata and global rendering policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Site title, used as the feed title.
    pub title: String,

    /// Site description, used as the feed description.
    pub description: String,

    /// Base URL of the wiki (e.g., "https://example.com/wiki/").
    pub url: String,

    /// Language code (e.g., "en").
    pub language: String,

    /// Use the page's first heading as item title.
    pub use_heading: bool,

    /// Links in rendered content are already canonical (absolute).
    /// When false, base-relative `href`/`src` values are made absolute.
    pub canonical: bool,

    /// Transliterate non-ASCII characters when cleaning ids.
    pub deaccent: bool,

    /// Regex of page ids that never appear in listings.
    pub hidden_pages: Option<String>,

    /// Expose cache diagnostics (`X-Cache-Used`) in responses.
    pub debug: bool,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: "Wiki".into(),
            description: String::new(),
            url: "http://localhost/".into(),
            language: "en".into(),
            use_heading: false,
            canonical: false,
            deaccent: true,
            hidden_pages: None,
            debug: false,
        }
    }
}

impl SiteInfoConfig {
    /// Base URL with exactly one trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}/", self.url.trim_end_matches('/'))
    }

    /// Path component of the base URL, with leading and trailing slash.
    ///
    /// `https://example.com/wiki` -> `/wiki/`, `https://example.com` -> `/`.
    pub fn base_path(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => {
                let path = parsed.path().trim_matches('/');
                if path.is_empty() {
                    "/".into()
                } else {
                    format!("/{path}/")
                }
            }
            Err(_) => "/".into(),
        }
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be a valid http(s) URL with a host
    /// - `hidden_pages` must be a valid regex
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match url::Url::parse(&self.url) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        "site.url",
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://wiki.example.com/",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        "site.url",
                        "URL must have a valid host",
                        "use format like https://wiki.example.com/",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    "site.url",
                    format!("invalid URL: {e}"),
                    "use format like https://wiki.example.com/",
                );
            }
        }

        if let Some(pattern) = &self.hidden_pages
            && let Err(e) = regex::Regex::new(pattern)
        {
            diag.error("site.hidden_pages", format!("invalid regex: {e}"));
        }

        if self.title.is_empty() {
            diag.warn("site.title", "empty title, feeds will have no channel title");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.language, "en");
        assert!(!config.site.canonical);
        assert!(config.site.deaccent);
        assert!(config.site.hidden_pages.is_none());
    }

    #[test]
    fn test_base_url_and_path() {
        let mut site = SiteInfoConfig::default();
        site.url = "https://example.com/wiki".into();
        assert_eq!(site.base_url(), "https://example.com/wiki/");
        assert_eq!(site.base_path(), "/wiki/");

        site.url = "https://example.com/".into();
        assert_eq!(site.base_url(), "https://example.com/");
        assert_eq!(site.base_path(), "/");
    }

    #[test]
    fn test_validate_bad_url() {
        let mut site = SiteInfoConfig::default();
        site.url = "ftp://example.com".into();
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(diag.has_errors());

        site.url = "not a url".into();
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_bad_hidden_pattern() {
        let mut site = SiteInfoConfig::default();
        site.hidden_pages = Some("(".into());
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, "site.hidden_pages");
    }
}
