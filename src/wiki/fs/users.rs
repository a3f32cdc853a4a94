//! Plain-text user database.
//!
//! One account per line, `#` starts a comment:
//!
//! ```text
//! login:passwordhash:Real Name:email:group1,group2
//! ```
//!
//! A literal `:` inside a field is written as `\:`.

use crate::log;
use crate::wiki::{UserDirectory, UserProfile};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct AuthFile {
    users: FxHashMap<String, UserProfile>,
}

impl AuthFile {
    /// Read a user file. A missing file yields an empty directory.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log!("warning"; "user file {} not found", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub fn parse(content: &str) -> Self {
        let users = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(parse_line)
            .map(|user| (user.login.clone(), user))
            .collect();
        Self { users }
    }
}

impl UserDirectory for AuthFile {
    fn user(&self, login: &str) -> Result<Option<UserProfile>> {
        Ok(self.users.get(login).cloned())
    }
}

fn parse_line(line: &str) -> Option<UserProfile> {
    let fields = split_fields(line);
    if fields.len() < 4 || fields[0].is_empty() {
        return None;
    }
    Some(UserProfile {
        login: fields[0].clone(),
        name: fields[2].clone(),
    })
}

/// Split on `:` not preceded by a backslash, unescaping `\:`.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&':') => {
                chars.next();
                current.push(':');
            }
            ':' => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = "\
# login:hash:name:mail:groups
alice:$1$abc:Alice Liddell:alice@example.com:admin,user
bob:x:Bob\\: The Builder:bob@example.com:
broken line
";

    #[test]
    fn test_parse_users() {
        let users = AuthFile::parse(USERS);
        let alice = users.user("alice").unwrap().unwrap();
        assert_eq!(alice.name, "Alice Liddell");
        assert_eq!(alice.login, "alice");

        let bob = users.user("bob").unwrap().unwrap();
        assert_eq!(bob.name, "Bob: The Builder");

        assert!(users.user("carol").unwrap().is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let users = AuthFile::load(&dir.path().join("users.auth")).unwrap();
        assert!(users.user("alice").unwrap().is_none());
    }
}
