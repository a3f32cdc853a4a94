//! `[users]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [users]
//! enable = true                 # look up authors in the user file
//! file = "conf/users.auth"      # login:hash:Real Name:email:groups
//! show_as = "username"          # loginname | username | username_link | email | email_link
//! ```

use crate::config::section::feed::{UnknownToken, token_enum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

token_enum! {
    /// How authors are displayed.
    ShowUserAs {
        LoginName => "loginname",
        #[default]
        UserName => "username",
        UserNameLink => "username_link",
        Email => "email",
        EmailLink => "email_link",
    }
}

impl ShowUserAs {
    /// Whether the account's real name replaces the login.
    pub const fn uses_real_name(self) -> bool {
        matches!(self, Self::UserName | Self::UserNameLink)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersConfig {
    /// Account lookup for author names.
    pub enable: bool,

    /// User database, relative to the config file.
    pub file: PathBuf,

    /// Author display policy.
    pub show_as: ShowUserAs,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            enable: false,
            file: "conf/users.auth".into(),
            show_as: ShowUserAs::UserName,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_users_defaults() {
        let config = test_parse_config("");
        assert!(!config.users.enable);
        assert_eq!(config.users.show_as, ShowUserAs::UserName);
        assert!(config.users.show_as.uses_real_name());
    }

    #[test]
    fn test_show_as() {
        let config = test_parse_config("[users]\nenable = true\nshow_as = \"username_link\"");
        assert!(config.users.enable);
        assert!(config.users.show_as.uses_real_name());
        assert!(!ShowUserAs::Email.uses_real_name());
    }
}
