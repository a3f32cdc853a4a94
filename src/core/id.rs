//! Page and media identifiers.
//!
//! Ids are colon-separated paths (`ns:sub:page`). Everything that reaches
//! a collaborator or a URL goes through [`clean_id`] first.

use regex::Regex;
use std::sync::LazyLock;

/// Namespace separator.
pub const SEP: char = ':';

/// Canonicalize a raw id or namespace.
///
/// Lowercases, maps `/` and `;` to `:`, whitespace to `_`, optionally
/// transliterates to ASCII, replaces anything else outside the id alphabet
/// with `_`, and collapses separator runs. Leading and trailing `:._-` are
/// trimmed.
pub fn clean_id(raw: &str, deaccent: bool) -> String {
    static RE_BAD: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_.:\-]").unwrap());
    static RE_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());
    static RE_SEP_AFTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":[:._\-]+").unwrap());
    static RE_SEP_BEFORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[:._\-]+:").unwrap());

    let mut id: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | ';' => SEP,
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    if deaccent {
        id = deunicode::deunicode(&id).replace(char::is_whitespace, "_");
    }
    id = id.to_lowercase();

    let id = RE_BAD.replace_all(&id, "_");
    let id = RE_UNDERSCORES.replace_all(&id, "_");
    let id = RE_SEP_AFTER.replace_all(&id, ":");
    let id = RE_SEP_BEFORE.replace_all(&id, ":");
    id.trim_matches(|c| matches!(c, ':' | '.' | '_' | '-'))
        .to_string()
}

/// Containing namespace of an id (`a:b:c` -> `a:b`, `c` -> ``).
pub fn namespace_of(id: &str) -> &str {
    id.rfind(SEP).map_or("", |pos| &id[..pos])
}

/// Last segment of an id (`a:b:c` -> `c`).
pub fn name_of(id: &str) -> &str {
    id.rfind(SEP).map_or(id, |pos| &id[pos + 1..])
}

/// Whether `id` lives in `ns` or below it. The root namespace contains all.
pub fn in_namespace(id: &str, ns: &str) -> bool {
    ns.is_empty()
        || id
            .strip_prefix(ns)
            .is_some_and(|rest| rest.starts_with(SEP))
}
