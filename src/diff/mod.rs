//! Line-based diff.
//!
//! Myers' linear-space algorithm: common prefix and suffix are trimmed, then
//! each region is split at its middle snake. A region whose edit distance
//! exceeds [`MAX_COST`] is emitted as one block of deletions followed by
//! one block of insertions, which bounds time and memory on large rewrites.
//! Deletions are emitted before insertions within a change.

mod format;

pub use format::{table, unified};

use std::ops::{Index, IndexMut};

/// Edit distance at which the search for a shorter script stops.
const MAX_COST: usize = 2048;

/// One line of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op<'a> {
    Equal(&'a str),
    Delete(&'a str),
    Insert(&'a str),
}

impl Op<'_> {
    const fn in_old(&self) -> bool {
        matches!(self, Self::Equal(_) | Self::Delete(_))
    }

    const fn in_new(&self) -> bool {
        matches!(self, Self::Equal(_) | Self::Insert(_))
    }
}

/// A run of changes with surrounding context. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<'a> {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub ops: Vec<Op<'a>>,
}

/// Edit script turning `old` into `new`.
pub fn diff_lines<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Op<'a>> {
    let radius = search_depth(old.len(), new.len()) + 1;
    let mut vf = Frontier::new(radius);
    let mut vb = Frontier::new(radius);

    let mut ops = Vec::with_capacity(old.len().max(new.len()));
    conquer(old, new, &mut vf, &mut vb, &mut ops);
    deletions_first(&mut ops);
    ops
}

/// Furthest-reaching x per diagonal `k`, indexed from `-radius` to `radius`.
struct Frontier {
    v: Vec<usize>,
    offset: isize,
}

impl Frontier {
    fn new(radius: usize) -> Self {
        Self {
            v: vec![0; 2 * radius + 1],
            offset: radius as isize,
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn search_depth(n: usize, m: usize) -> usize {
    ((n + m + 1) / 2 + 1).min(MAX_COST)
}

fn common_prefix(a: &[&str], b: &[&str]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[&str], b: &[&str]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn conquer<'a>(a: &[&'a str], b: &[&'a str], vf: &mut Frontier, vb: &mut Frontier, ops: &mut Vec<Op<'a>>) {
    let prefix = common_prefix(a, b);
    ops.extend(a[..prefix].iter().map(|l| Op::Equal(*l)));
    let (a, b) = (&a[prefix..], &b[prefix..]);

    let suffix = common_suffix(a, b);
    let (a, tail) = a.split_at(a.len() - suffix);
    let b = &b[..b.len() - suffix];

    match middle_snake(a, b, vf, vb) {
        Some((x, y)) if (x, y) != (0, 0) && (x, y) != (a.len(), b.len()) && x <= a.len() && y <= b.len() => {
            conquer(&a[..x], &b[..y], vf, vb, ops);
            conquer(&a[x..], &b[y..], vf, vb, ops);
        }
        _ => {
            ops.extend(a.iter().map(|l| Op::Delete(*l)));
            ops.extend(b.iter().map(|l| Op::Insert(*l)));
        }
    }

    ops.extend(tail.iter().map(|l| Op::Equal(*l)));
}

/// Start of a snake on an optimal path through the middle of the edit graph,
/// or `None` when the regions are empty or the edit distance is too large.
fn middle_snake(a: &[&str], b: &[&str], vf: &mut Frontier, vb: &mut Frontier) -> Option<(usize, usize)> {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return None;
    }
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;
    vf[1] = 0;
    vb[1] = 0;

    for d in 0..search_depth(n, m) as isize {
        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && vf[k - 1] < vf[k + 1]) {
                vf[k + 1]
            } else {
                vf[k - 1] + 1
            };
            let y = (x as isize - k) as usize;
            let (x0, y0) = (x, y);
            if x < n && y < m {
                x += common_prefix(&a[x..], &b[y..]);
            }
            vf[k] = x;
            if odd && (k - delta).abs() <= d - 1 && vf[k] + vb[-(k - delta)] >= n {
                return Some((x0, y0));
            }
        }

        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && vb[k - 1] < vb[k + 1]) {
                vb[k + 1]
            } else {
                vb[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            if x < n && y < m {
                let snake = common_suffix(&a[..n - x], &b[..m - y]);
                x += snake;
                y += snake;
            }
            vb[k] = x;
            if !odd && (k - delta).abs() <= d && vb[k] + vf[-(k - delta)] >= n {
                return Some((n.checked_sub(x)?, m.checked_sub(y)?));
            }
        }
    }
    None
}

/// Within each run of changes, move deletions ahead of insertions.
fn deletions_first(ops: &mut [Op<'_>]) {
    for run in ops.split_mut(|op| matches!(op, Op::Equal(_))) {
        run.sort_by_key(|op| matches!(op, Op::Insert(_)));
    }
}

/// Group an edit script into hunks with `context` unchanged lines around
/// each change. Changes closer than `2 * context` lines share a hunk.
pub fn hunks<'a>(ops: &[Op<'a>], context: usize) -> Vec<Hunk<'a>> {
    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, Op::Equal(_)))
        .map(|(k, _)| k)
        .collect();
    let Some(&first) = changes.first() else {
        return Vec::new();
    };

    let mut groups = vec![(first, first)];
    for &k in &changes[1..] {
        let last = groups.len() - 1;
        if k - groups[last].1 - 1 <= 2 * context {
            groups[last].1 = k;
        } else {
            groups.push((k, k));
        }
    }

    groups
        .into_iter()
        .map(|(first, last)| {
            let lo = first.saturating_sub(context);
            let hi = (last + context).min(ops.len() - 1);
            let slice = &ops[lo..=hi];
            let old_len = slice.iter().filter(|op| op.in_old()).count();
            let new_len = slice.iter().filter(|op| op.in_new()).count();
            Hunk {
                old_start: ops[..lo].iter().filter(|op| op.in_old()).count() + 1,
                old_len,
                new_start: ops[..lo].iter().filter(|op| op.in_new()).count() + 1,
                new_len,
                ops: slice.to_vec(),
            }
        })
        .collect()
}
