//! Shared helpers: dates, escaping, hashing, paths, MIME types.

pub mod date;
pub mod hash;
pub mod html;
pub mod mime;
pub mod path;
