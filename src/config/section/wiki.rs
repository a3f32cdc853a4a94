//! `[wiki]` section configuration.
//!
//! Location of the content repository read by the bundled filesystem
//! collaborators.
//!
//! # Example
//!
//! ```toml
//! [wiki]
//! data_dir = "data"         # pages/, attic/, meta/, media/, changes.log
//! media_revisions = true    # media changes appear in recent changes
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Root of the content repository, relative to the config file.
    pub data_dir: PathBuf,

    /// Media revisions are tracked in the change log.
    pub media_revisions: bool,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
            media_revisions: true,
        }
    }
}

impl WikiConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.data_dir.is_dir() {
            diag.warn(
                "wiki.data_dir",
                format!("`{}` is not a directory, feeds will be empty", self.data_dir.display()),
            );
        }
    }
}
