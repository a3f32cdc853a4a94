//! Feed error taxonomy.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Feeds are switched off (`[feed].enable = false`).
    #[error("RSS feed is disabled.")]
    FeatureDisabled,

    /// A request value outside its allowed set. Recovered by the resolver.
    #[error("invalid value `{value}` for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: String },

    /// Assembling or serializing the document failed.
    #[error("{0}")]
    BuildFailure(String),

    /// A record's backing content is gone. Recovered per item.
    #[error("content of `{0}` is missing")]
    MissingContent(String),

    /// Storing the rendered document failed.
    #[error("feed cache: {0}")]
    Cache(#[from] io::Error),
}

impl FeedError {
    /// HTTP status of the error envelope.
    pub const fn status(&self) -> u16 {
        match self {
            Self::FeatureDisabled => 404,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_status() {
        assert_eq!(FeedError::FeatureDisabled.to_string(), "RSS feed is disabled.");
        assert_eq!(FeedError::FeatureDisabled.status(), 404);

        let err = FeedError::InvalidParameter {
            name: "linkto",
            value: "sideways".into(),
        };
        assert_eq!(err.to_string(), "invalid value `sideways` for parameter `linkto`");

        let err = FeedError::from(io::Error::other("disk full"));
        assert_eq!(err.status(), 500);
        assert!(err.to_string().contains("disk full"));
    }
}
