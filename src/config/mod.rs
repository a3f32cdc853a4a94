//! Site configuration management for `wikifeed.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── cache      # [cache]
//! │   ├── feed       # [feed] and the feed option enums
//! │   ├── search     # [search]
//! │   ├── serve      # [serve]
//! │   ├── site       # [site]
//! │   ├── users      # [users]
//! │   └── wiki       # [wiki]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── handle     # Reloadable config handle
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                           |
//! |--------------|---------------------------------------------------|
//! | `[site]`     | Title, base URL, heading/canonical policy         |
//! | `[wiki]`     | Content repository location                       |
//! | `[feed]`     | Feed defaults, enable switch, update interval     |
//! | `[users]`    | Author lookup and display policy                  |
//! | `[search]`   | Search feed switch                                |
//! | `[cache]`    | Cache backend and extra dependencies              |
//! | `[serve]`    | HTTP server (interface, port, worker threads)     |

pub mod section;
pub mod types;
mod util;

pub use util::find_config_file;

pub use section::{
    CacheBackend, CacheConfig, ContentType, FeedFormat, FeedMode, FeedSectionConfig,
    ItemContent, LinkTo, SearchConfig, ServeConfig, ShowUserAs, SiteInfoConfig, SortOrder,
    UnknownToken, UsersConfig, WikiConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, ConfigHandle};

use crate::log;
use crate::utils::path::{normalize_path, resolve_config_path};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

// ============================================================================
// command-line overrides
// ============================================================================

/// Values given on the command line that take precedence over the file.
///
/// Kept on the config so a reload applies them again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub interface: Option<IpAddr>,
    pub port: Option<u16>,
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing wikifeed.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Command-line overrides applied on load (internal use only)
    #[serde(skip)]
    pub overrides: Overrides,

    #[serde(default)]
    pub site: SiteInfoConfig,

    #[serde(default)]
    pub wiki: WikiConfig,

    #[serde(default)]
    pub feed: FeedSectionConfig,

    #[serde(default)]
    pub users: UsersConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load, finalize and validate the config file at `path`.
    ///
    /// Unknown keys are reported as warnings; validation problems are
    /// collected and returned together as [`ConfigError::Diagnostics`].
    pub fn load(path: &Path, overrides: &Overrides) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }

        let mut config = Self::from_path(path)?;
        config.config_path = normalize_path(path);
        config.overrides = overrides.clone();
        config.finalize();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Resolve paths against the config directory and apply overrides.
    fn finalize(&mut self) {
        self.root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let root = self.root.clone();
        self.wiki.data_dir = resolve_config_path(&self.wiki.data_dir, &root);
        self.users.file = resolve_config_path(&self.users.file, &root);
        self.cache.dir = resolve_config_path(&self.cache.dir, &root);
        self.cache.depends = self
            .cache
            .depends
            .iter()
            .map(|p| resolve_config_path(p, &root))
            .collect();

        if let Some(interface) = self.overrides.interface {
            self.serve.interface = interface;
        }
        if let Some(port) = self.overrides.port {
            self.serve.port = port;
        }
    }

    /// Validate every section, printing warnings and returning all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.wiki.validate(&mut diag);
        self.feed.validate(&mut diag);
        self.cache.validate(&mut diag);
        self.serve.validate(&mut diag);
        if self.users.enable && !self.users.file.is_file() {
            diag.warn(
                "users.file",
                format!("`{}` not found, authors keep their login", self.users.file.display()),
            );
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Files whose modification invalidates every cached feed.
    ///
    /// The config file itself plus `[cache].depends`.
    pub fn cache_dependencies(&self) -> Vec<PathBuf> {
        let mut deps = Vec::with_capacity(self.cache.depends.len() + 1);
        if !self.config_path.as_os_str().is_empty() {
            deps.push(self.config_path.clone());
        }
        deps.extend(self.cache.depends.iter().cloned());
        deps
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet without touching the filesystem.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
