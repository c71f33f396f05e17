// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};

use crate::error::FeedError;

/// Represents a parsed podcast feed
#[derive(Debug, Clone)]
pub struct Feed {
    /// Channel title
    pub title: String,
    /// Channel-level author (itunes:author, falling back to managingEditor)
    pub author: Option<String>,
    /// Feed items in document order, fully materialized
    pub items: Vec<Item>,
}

/// A single feed item as it appears in the document.
///
/// The enclosure URL stays optional here; deciding what to do with an item
/// that has no media attached is the caller's concern, not the parser's.
#[derive(Debug, Clone)]
pub struct Item {
    pub title: String,
    pub enclosure_url: Option<String>,
    pub summary: Option<String>,
    pub pub_date: Option<DateTime<FixedOffset>>,
}

/// Parse RSS feed XML bytes into a Feed struct
///
/// A document without an rss/channel root is a parse error; nothing about
/// the feed is usable in that case.
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Feed, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let author = channel
        .itunes_ext()
        .and_then(|ext| ext.author().map(String::from))
        .or_else(|| channel.managing_editor().map(String::from));

    let items = channel.items().iter().map(parse_item).collect();

    Ok(Feed {
        title: channel.title().to_string(),
        author,
        items,
    })
}

fn parse_item(item: &rss::Item) -> Item {
    let title = item
        .title()
        .map(String::from)
        .unwrap_or_else(|| "Untitled Episode".to_string());

    let summary = item
        .itunes_ext()
        .and_then(|ext| ext.summary().map(String::from))
        .or_else(|| item.description().map(String::from));

    let pub_date = item
        .pub_date()
        .and_then(|date_str| DateTime::parse_from_rfc2822(date_str).ok());

    Item {
        title,
        enclosure_url: item.enclosure().map(|e| e.url().to_string()),
        summary,
        pub_date,
    }
}
