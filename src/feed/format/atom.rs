//! Atom 1.0 writer.
//!
//! `updated` is mandatory on the feed and on every entry; entries without a
//! date inherit the feed's value (see [`FeedDocument::updated`]).

use super::{FeedDocument, GENERATOR};
use crate::feed::item::FeedItem;
use crate::utils::date::unix_to_rfc3339;
use crate::utils::mime;
use anyhow::{Result, anyhow};
use atom_syndication::{
    CategoryBuilder, Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime, GeneratorBuilder,
    Link, LinkBuilder, Person, PersonBuilder, Text,
};

pub fn render(doc: &FeedDocument) -> Result<String> {
    let updated = fixed_date(doc.updated())?;

    let entries = doc
        .items
        .iter()
        .map(|item| to_entry(item, updated))
        .collect::<Result<Vec<Entry>>>()?;

    let self_link: Link = LinkBuilder::default()
        .href(doc.meta.self_link.clone())
        .rel("self".to_string())
        .mime_type(Some(mime::types::ATOM.to_string()))
        .build();

    let alternate_link: Link = LinkBuilder::default()
        .href(doc.meta.link.clone())
        .rel("alternate".to_string())
        .build();

    let feed: Feed = FeedBuilder::default()
        .title(Text::plain(doc.meta.title.clone()))
        .id(&doc.meta.link)
        .updated(updated)
        .links(vec![self_link, alternate_link])
        .subtitle(Some(Text::plain(doc.meta.description.clone())).filter(|t| !t.value.is_empty()))
        .generator(Some(GeneratorBuilder::default().value(GENERATOR).build()))
        .lang(Some(doc.meta.language.clone()).filter(|l| !l.is_empty()))
        .entries(entries)
        .build();

    Ok(feed.to_string())
}

fn to_entry(item: &FeedItem, feed_updated: FixedDateTime) -> Result<Entry> {
    let updated = match item.date {
        Some(date) => fixed_date(date)?,
        None => feed_updated,
    };

    let link: Link = LinkBuilder::default()
        .href(&item.link)
        .rel("alternate".to_string())
        .build();

    let author: Person = PersonBuilder::default()
        .name(item.author.clone())
        .email(Some(item.author_email.clone()))
        .build();

    let categories = item
        .categories
        .iter()
        .map(|c| CategoryBuilder::default().term(c.as_str()).build())
        .collect::<Vec<_>>();

    Ok(EntryBuilder::default()
        .title(Text::plain(item.title.clone()))
        .id(&item.link)
        .updated(updated)
        .published(item.date.map(|_| updated))
        .links(vec![link])
        .authors(vec![author])
        .categories(categories)
        .summary(Some(Text::html(item.description.clone())).filter(|t| !t.value.is_empty()))
        .build())
}

fn fixed_date(secs: i64) -> Result<FixedDateTime> {
    unix_to_rfc3339(secs)
        .parse()
        .map_err(|e| anyhow!("invalid feed date {secs}: {e}"))
}
