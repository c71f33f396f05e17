// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::error::ExtractError;
use crate::feed::Item;

use super::filename::sanitize_title;

/// A downloadable view over a feed item.
///
/// Derived on demand from the parsed Item; an Episode always has a valid
/// media URL, so the missing-enclosure case is dealt with exactly once,
/// here, instead of at every download site.
#[derive(Debug, Clone)]
pub struct Episode {
    pub title: String,
    pub sanitized_title: String,
    pub media_url: Url,
    pub summary: Option<String>,
    pub pub_date: Option<DateTime<FixedOffset>>,
}

/// Derive a downloadable Episode from a raw feed item.
///
/// An item without an enclosure URL is a per-episode soft failure: the
/// caller decides whether to skip it or abort.
pub fn extract_episode(item: &Item) -> Result<Episode, ExtractError> {
    let enclosure_url =
        item.enclosure_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ExtractError::MissingEnclosure {
                title: item.title.clone(),
            })?;

    let media_url = Url::parse(enclosure_url).map_err(|e| ExtractError::InvalidMediaUrl {
        title: item.title.clone(),
        source: e,
    })?;

    Ok(Episode {
        title: item.title.clone(),
        sanitized_title: sanitize_title(&item.title),
        media_url,
        summary: item.summary.clone(),
        pub_date: item.pub_date,
    })
}
