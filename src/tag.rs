// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use id3::frame::Comment;
use id3::{ErrorKind, Tag, TagLike, Version};

use crate::error::TagError;

/// Write ID3 metadata to a downloaded audio file.
///
/// Parses the existing tag if the file carries one (a file without a tag is
/// not an error), sets the artist and title text frames, appends one comment
/// frame with the episode summary, and persists everything back to the same
/// file. ID3v2.4 is used, so all text is UTF-8 encoded.
pub fn write_tags(
    path: &Path,
    artist: Option<&str>,
    title: &str,
    comment: Option<&str>,
) -> Result<(), TagError> {
    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
        Err(e) => {
            return Err(TagError::OpenFailed {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if let Some(artist) = artist {
        tag.set_artist(artist);
    }
    tag.set_title(title);

    if let Some(text) = comment {
        tag.add_frame(Comment {
            lang: "eng".to_string(),
            description: String::new(),
            text: text.to_string(),
        });
    }

    tag.write_to_path(path, Version::Id3v24)
        .map_err(|e| TagError::SaveFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_tags_round_trips_artist_title_and_comment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("episode.mp3");
        std::fs::write(&path, b"fake audio payload").unwrap();

        write_tags(&path, Some("A"), "T", Some("C")).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.artist(), Some("A"));
        assert_eq!(tag.title(), Some("T"));

        let comments: Vec<_> = tag.comments().collect();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "C");
    }

    #[test]
    fn write_tags_without_artist_or_comment_sets_only_title() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("episode.mp3");
        std::fs::write(&path, b"fake audio payload").unwrap();

        write_tags(&path, None, "Only Title", None).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.artist(), None);
        assert_eq!(tag.title(), Some("Only Title"));
        assert_eq!(tag.comments().count(), 0);
    }

    #[test]
    fn write_tags_preserves_audio_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("episode.mp3");
        std::fs::write(&path, b"fake audio payload").unwrap();

        write_tags(&path, Some("Artist"), "Title", Some("Summary")).unwrap();

        let content = std::fs::read(&path).unwrap();
        assert!(
            content
                .windows(b"fake audio payload".len())
                .any(|w| w == b"fake audio payload")
        );
    }

    #[test]
    fn write_tags_fails_on_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.mp3");

        let result = write_tags(&path, Some("A"), "T", None);
        assert!(result.is_err());
    }
}
