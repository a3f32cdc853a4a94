//! `[serve]` section configuration.
//!
//! Settings for the HTTP front end.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"                 # 0.0.0.0 to listen on all interfaces
//! port = 8080
//! threads = 4                             # request worker pool size
//! remote_user_header = "X-Remote-User"    # identity set by a trusted proxy
//! reload = true                           # pick up config edits while running
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Worker threads handling requests.
    pub threads: usize,

    /// Request header carrying the authenticated user.
    /// Without it every request is anonymous.
    pub remote_user_header: Option<String>,

    /// Re-read the config file between requests when it changes.
    pub reload: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,
            threads: 4,
            remote_user_header: None,
            reload: true,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.threads == 0 {
            diag.error_with_hint("serve.threads", "must be at least 1", "set threads = 4");
        }
        if let Some(header) = &self.remote_user_header
            && header.trim().is_empty()
        {
            diag.error("serve.remote_user_header", "header name is empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "[serve]\ninterface = \"0.0.0.0\"\nport = 9000\nthreads = 8\nremote_user_header = \"X-User\"",
        );

        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.serve.threads, 8);
        assert_eq!(config.serve.remote_user_header.as_deref(), Some("X-User"));
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.threads, 4);
        assert!(config.serve.remote_user_header.is_none());
        assert!(config.serve.reload);
    }

    #[test]
    fn test_serve_config_ipv6() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    }
}
