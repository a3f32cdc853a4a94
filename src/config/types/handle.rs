//! Shared config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so a
//! long-running server picks up edits to `wikifeed.toml` without restarts.
//! Requests take one snapshot with [`ConfigHandle::load`] and pass it down
//! explicitly; a reload never changes the config under a running request.

use crate::config::SiteConfig;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct ConfigHandle {
    current: ArcSwap<SiteConfig>,
    /// Hash of the config file content the current snapshot was built from.
    hash: AtomicU64,
}

impl ConfigHandle {
    pub fn new(config: SiteConfig) -> Self {
        let hash = fs::read(&config.config_path)
            .map(|content| crate::utils::hash::compute(&content))
            .unwrap_or(0);

        Self {
            current: ArcSwap::from_pointee(config),
            hash: AtomicU64::new(hash),
        }
    }

    /// Current config snapshot.
    #[inline]
    pub fn load(&self) -> Arc<SiteConfig> {
        self.current.load_full()
    }

    /// Reload config from disk if content changed.
    ///
    /// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged.
    /// On error the previous snapshot stays active.
    pub fn reload_if_changed(&self) -> Result<bool> {
        let current = self.load();

        let content = fs::read(&current.config_path)?;
        let new_hash = crate::utils::hash::compute(&content);
        if new_hash == self.hash.load(Ordering::Relaxed) {
            return Ok(false);
        }

        let new_config = SiteConfig::load(&current.config_path, &current.overrides)?;
        self.current.store(Arc::new(new_config));
        self.hash.store(new_hash, Ordering::Relaxed);

        Ok(true)
    }
}
