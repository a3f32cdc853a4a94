//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! backend = "file"                # file | memory
//! dir = ".cache/feed"             # entries for the file backend
//! depends = ["conf/acl.conf"]     # extra files whose edits invalidate feeds
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where rendered feeds are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One JSON file per entry, replaced atomically.
    #[default]
    File,
    /// Process-local map, lost on restart.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// Cache directory, relative to the config file.
    pub dir: PathBuf,

    /// Additional dependency files (the config file is always one).
    pub depends: Vec<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            dir: ".cache/feed".into(),
            depends: Vec::new(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for dep in &self.depends {
            if !dep.exists() {
                diag.warn(
                    "cache.depends",
                    format!("`{}` does not exist", dep.display()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_cache_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert!(config.cache.depends.is_empty());
    }

    #[test]
    fn test_cache_memory_backend() {
        let config = test_parse_config("[cache]\nbackend = \"memory\"\ndepends = [\"a.conf\"]");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.depends.len(), 1);
    }
}
