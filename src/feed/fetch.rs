// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::error::FeedError;
use crate::http::HttpClient;

use super::parse::{Feed, parse_feed};

/// Fetch and parse a podcast feed from a URL
///
/// Performs a single GET request. A transport failure, a non-success status,
/// or a malformed document each surface as a typed FeedError.
pub async fn fetch_feed<C: HttpClient>(client: &C, url: &str) -> Result<Feed, FeedError> {
    Url::parse(url)?;

    let response = client.get(url).await.map_err(|e| FeedError::FetchFailed {
        url: url.to_string(),
        source: e,
    })?;

    if !response.is_success() {
        return Err(FeedError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    let bytes = response
        .collect_body()
        .await
        .map_err(|e| FeedError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;

    parse_feed(&bytes)
}
