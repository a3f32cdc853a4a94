//! Diff renderers.
//!
//! - `unified()`: plain text, caller escapes it before embedding
//! - `table()`: four-column HTML rows, already escaped

use super::{Hunk, Op, diff_lines, hunks};
use crate::utils::html::escape;
use std::fmt::Write;

/// Context lines around changes in unified output.
const UNIFIED_CONTEXT: usize = 4;

/// Context lines around changes in table output.
const TABLE_CONTEXT: usize = 2;

fn split(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Unified diff of `old` -> `new` (no file headers).
pub fn unified(old: &str, new: &str) -> String {
    let (old, new) = (split(old), split(new));
    let ops = diff_lines(&old, &new);

    let mut out = String::new();
    for hunk in hunks(&ops, UNIFIED_CONTEXT) {
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            range(hunk.old_start, hunk.old_len),
            range(hunk.new_start, hunk.new_len)
        );
        for op in &hunk.ops {
            let (mark, line) = match op {
                Op::Equal(l) => (' ', l),
                Op::Delete(l) => ('-', l),
                Op::Insert(l) => ('+', l),
            };
            out.push(mark);
            out.push_str(line);
            out.push('\n');
        }
    }
    out.truncate(out.trim_end_matches('\n').len());
    out
}

fn range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start - 1),
        1 => start.to_string(),
        _ => format!("{start},{len}"),
    }
}

/// Table rows of `old` -> `new`, four cells per row.
///
/// Deletions and insertions of one change are paired side by side.
pub fn table(old: &str, new: &str) -> String {
    let (old, new) = (split(old), split(new));
    let ops = diff_lines(&old, &new);

    let mut out = String::new();
    for hunk in hunks(&ops, TABLE_CONTEXT) {
        push_block(&mut out, &hunk);
    }
    out
}

fn push_block(out: &mut String, hunk: &Hunk) {
    let _ = write!(
        out,
        "<tr><td class=\"diff-blockheader\" colspan=\"2\">Line {}:</td>\
         <td class=\"diff-blockheader\" colspan=\"2\">Line {}:</td></tr>\n",
        hunk.old_start, hunk.new_start
    );

    let mut deleted = Vec::new();
    let mut added = Vec::new();
    for op in &hunk.ops {
        match op {
            Op::Delete(l) => deleted.push(*l),
            Op::Insert(l) => added.push(*l),
            Op::Equal(l) => {
                flush_change(out, &mut deleted, &mut added);
                let l = escape(l);
                let _ = write!(
                    out,
                    "<tr><td class=\"diff-lineheader\">&#160;</td><td class=\"diff-context\">{l}</td>\
                     <td class=\"diff-lineheader\">&#160;</td><td class=\"diff-context\">{l}</td></tr>\n"
                );
            }
        }
    }
    flush_change(out, &mut deleted, &mut added);
}

fn flush_change(out: &mut String, deleted: &mut Vec<&str>, added: &mut Vec<&str>) {
    let rows = deleted.len().max(added.len());
    for k in 0..rows {
        out.push_str("<tr>");
        match deleted.get(k) {
            Some(l) => {
                let _ = write!(
                    out,
                    "<td class=\"diff-lineheader\">-</td><td class=\"diff-deletedline\">{}</td>",
                    escape(l)
                );
            }
            None => out.push_str("<td colspan=\"2\">&#160;</td>"),
        }
        match added.get(k) {
            Some(l) => {
                let _ = write!(
                    out,
                    "<td class=\"diff-lineheader\">+</td><td class=\"diff-addedline\">{}</td>",
                    escape(l)
                );
            }
            None => out.push_str("<td colspan=\"2\">&#160;</td>"),
        }
        out.push_str("</tr>\n");
    }
    deleted.clear();
    added.clear();
}
