//! `[search]` section configuration.

use serde::{Deserialize, Serialize};

/// Full-text search feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Serve `mode=search` feeds.
    pub enable: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_search_toggle() {
        assert!(test_parse_config("").search.enable);
        assert!(!test_parse_config("[search]\nenable = false").search.enable);
    }
}
