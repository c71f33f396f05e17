// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Characters stripped from titles before they become filenames
const FORBIDDEN_CHARS: [char; 3] = [':', '?', '|'];

/// Sanitize an episode title for use as a filename stem.
///
/// Removes `:`, `?` and `|` outright. Everything else passes through
/// untouched, in original order: no whitespace collapsing, no length limit.
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect()
}

/// Build the output filename for an episode title: `<sanitized>.mp3`
pub fn episode_filename(title: &str) -> String {
    format!("{}.mp3", sanitize_title(title))
}
