//! `[feed]` section configuration and the feed option vocabularies.
//!
//! The enums here double as the typed values of request parameters: each
//! one parses from its query-string token with `FromStr`.
//!
//! # Example
//!
//! ```toml
//! [feed]
//! enable = true
//! link_to = "diff"        # diff | page | rev | current
//! content = "abstract"    # abstract | diff | htmldiff | html
//! items = 20
//! media = "both"          # pages | media | both
//! format = "rss1"         # rss | rss2 | atom | atom1 | rss1
//! update_interval = 300   # seconds a cached feed stays fresh
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A token outside an enum's allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub value: String,
}

/// Declare a token-backed enum: serde names, `as_str`, `FromStr`, `Display`.
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $token)] $variant ),+
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $token ),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $( $token => Ok(Self::$variant), )+
                    _ => Err(UnknownToken {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use token_enum;

token_enum! {
    /// Which records a feed lists.
    FeedMode {
        #[default]
        Recent => "recent",
        List => "list",
        Search => "search",
    }
}

token_enum! {
    /// Where item links point.
    LinkTo {
        #[default]
        Diff => "diff",
        Page => "page",
        Rev => "rev",
        Current => "current",
    }
}

token_enum! {
    /// What goes into an item's description.
    ItemContent {
        #[default]
        Abstract => "abstract",
        Diff => "diff",
        HtmlDiff => "htmldiff",
        Html => "html",
    }
}

token_enum! {
    /// Which kinds of content recent changes include.
    ContentType {
        Pages => "pages",
        Media => "media",
        #[default]
        Both => "both",
    }
}

token_enum! {
    /// Namespace listing order.
    SortOrder {
        #[default]
        Natural => "natural",
        Date => "date",
    }
}

token_enum! {
    /// Output format, keyed by the `type` request token.
    FeedFormat {
        Rss091 => "rss",
        Rss2 => "rss2",
        Atom03 => "atom",
        Atom1 => "atom1",
        #[default]
        Rss1 => "rss1",
    }
}

impl FeedFormat {
    /// Map a `type` token; anything unrecognized is RSS 1.0.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(Self::Rss1)
    }

    /// MIME type sent with documents of this format.
    pub const fn mime_type(self) -> &'static str {
        use crate::utils::mime::types;
        match self {
            Self::Rss091 | Self::Rss2 => types::TEXT_XML,
            Self::Atom03 | Self::Rss1 => types::XML,
            Self::Atom1 => types::ATOM,
        }
    }

    /// Human-readable format name and version.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rss091 => "RSS0.91",
            Self::Rss2 => "RSS2.0",
            Self::Atom03 => "ATOM0.3",
            Self::Atom1 => "ATOM1.0",
            Self::Rss1 => "RSS1.0",
        }
    }
}

/// Feed defaults and policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSectionConfig {
    /// Serve feeds at all.
    pub enable: bool,
    /// Default `linkto`.
    pub link_to: LinkTo,
    /// Default `content`.
    pub content: ItemContent,
    /// Default `num`.
    pub items: u32,
    /// Default `view`.
    pub media: ContentType,
    /// Default `type`.
    pub format: FeedFormat,
    /// Seconds a cached feed stays fresh (0 disables reuse).
    pub update_interval: u64,
    /// Append edit summaries to item titles.
    pub show_summary: bool,
    /// Include deletions in recent changes.
    pub show_deleted: bool,
}

impl Default for FeedSectionConfig {
    fn default() -> Self {
        Self {
            enable: true,
            link_to: LinkTo::Diff,
            content: ItemContent::Abstract,
            items: 20,
            media: ContentType::Both,
            format: FeedFormat::Rss1,
            update_interval: 5 * 60,
            show_summary: true,
            show_deleted: true,
        }
    }
}

impl FeedSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.update_interval == 0 {
            diag.warn("feed.update_interval", "0 disables feed caching");
        }
    }
}
