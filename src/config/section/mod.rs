//! Configuration section definitions.
//!
//! Each submodule maps to one table of `wikifeed.toml`.

pub mod cache;
pub mod feed;
mod search;
mod serve;
mod site;
pub mod users;
mod wiki;

pub use cache::{CacheBackend, CacheConfig};
pub use feed::{
    ContentType, FeedFormat, FeedMode, FeedSectionConfig, ItemContent, LinkTo, SortOrder,
    UnknownToken,
};
pub use search::SearchConfig;
pub use serve::ServeConfig;
pub use site::SiteInfoConfig;
pub use users::{ShowUserAs, UsersConfig};
pub use wiki::WikiConfig;
