//! Item author resolution.

use crate::config::UsersConfig;
use crate::debug;
use crate::wiki::UserDirectory;

pub const ANONYMOUS: &str = "Anonymous";
pub const ANONYMOUS_EMAIL: &str = "anonymous@undisclosed.example.com";
const UNDISCLOSED_DOMAIN: &str = "undisclosed.example.com";

/// Display name and contact for an author id.
pub fn resolve(author: Option<&str>, users: &UsersConfig, directory: &dyn UserDirectory) -> (String, String) {
    let Some(login) = author.map(str::trim).filter(|a| !a.is_empty()) else {
        return (ANONYMOUS.into(), ANONYMOUS_EMAIL.into());
    };
    let email = format!("{login}@{UNDISCLOSED_DOMAIN}");

    if !users.enable || !users.show_as.uses_real_name() {
        return (login.into(), email);
    }
    match directory.user(login) {
        Ok(Some(profile)) if !profile.name.is_empty() => (profile.name, email),
        Ok(_) => (login.into(), email),
        Err(e) => {
            debug!("feed"; "user lookup for {} failed: {:#}", login, e);
            (login.into(), email)
        }
    }
}
