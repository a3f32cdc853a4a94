//! RSS 2.0 writer.

use super::{FeedDocument, GENERATOR};
use crate::feed::item::FeedItem;
use crate::utils::date::unix_to_rfc2822;
use anyhow::{Result, anyhow};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};

pub fn render(doc: &FeedDocument) -> Result<String> {
    let items: Vec<_> = doc.items.iter().map(to_rss_item).collect();

    let channel = ChannelBuilder::default()
        .title(&doc.meta.title)
        .link(&doc.meta.link)
        .description(&doc.meta.description)
        .language(Some(doc.meta.language.clone()).filter(|l| !l.is_empty()))
        .generator(GENERATOR.to_string())
        .last_build_date(doc.meta.generated.map(unix_to_rfc2822))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
    Ok(channel.to_string())
}

fn to_rss_item(item: &FeedItem) -> rss::Item {
    let categories = item
        .categories
        .iter()
        .map(|c| CategoryBuilder::default().name(c.as_str()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(item.link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(&item.link).build())
        .description(Some(item.description.clone()).filter(|d| !d.is_empty()))
        .pub_date(item.date.map(unix_to_rfc2822))
        .author(Some(rss_author(item)))
        .categories(categories)
        .build()
}

/// RSS author format: "email (Name)".
fn rss_author(item: &FeedItem) -> String {
    format!("{} ({})", item.author_email, item.author)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_channel_fields() {
        let xml = render(&document()).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();

        assert_eq!(channel.title(), "Test Wiki");
        assert_eq!(channel.link(), "https://wiki.example.com/");
        assert_eq!(channel.generator(), Some("wikifeed"));
        assert_eq!(channel.last_build_date(), Some("Sat, 15 Jun 2024 14:30:45 GMT"));
        assert_eq!(channel.items().len(), 2);
    }

    #[test]
    fn test_item_fields() {
        let xml = render(&document()).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let first = &channel.items()[0];

        assert_eq!(first.title(), Some("ns:a - fixed <typo>"));
        assert_eq!(first.link(), Some("https://wiki.example.com/doku.php?id=ns:a&do=diff"));
        assert_eq!(first.author(), Some("alice@undisclosed.example.com (Alice)"));
        assert_eq!(first.categories()[0].name(), "ns");
        assert!(first.pub_date().is_some());
        assert!(channel.items()[1].pub_date().is_none());
    }
}
