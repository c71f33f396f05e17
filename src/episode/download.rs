use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::extract::Episode;

/// Download an episode's media file to the specified output path
///
/// Creates (or truncates) the destination file, then streams the response
/// body to it chunk by chunk, reporting progress through the reporter.
/// Returns the number of bytes downloaded on success.
///
/// On a mid-stream failure the partially written file stays on disk; the
/// caller owns any cleanup policy.
pub async fn download_media<C: HttpClient>(
    client: &C,
    episode: &Episode,
    output_path: &Path,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let url = episode.media_url.as_str();

    let mut file = File::create(output_path)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    let response = client.get(url).await.map_err(|e| DownloadError::HttpFailed {
        url: url.to_string(),
        source: e,
    })?;

    if !response.is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    reporter.report(ProgressEvent::DownloadStarting {
        episode_title: episode.title.clone(),
        content_length: response.content_length,
    });

    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::FileWriteFailed {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::DownloadProgress {
            episode_title: episode.title.clone(),
            bytes_downloaded,
            total_bytes: response.content_length,
        });
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    reporter.report(ProgressEvent::DownloadCompleted {
        episode_title: episode.title.clone(),
        bytes_downloaded,
    });

    Ok(bytes_downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ByteStream, HttpResponse};
    use crate::progress::NoopReporter;
    use async_trait::async_trait;
    use bytes::Bytes;
    use tempfile::tempdir;
    use url::Url;

    struct MockHttpClient {
        response_data: Vec<u8>,
        status: u16,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            let data = self.response_data.clone();
            let len = data.len() as u64;

            let stream: ByteStream =
                Box::pin(futures::stream::once(async move { Ok(Bytes::from(data)) }));

            Ok(HttpResponse {
                status: self.status,
                content_length: Some(len),
                body: stream,
            })
        }
    }

    fn make_episode() -> Episode {
        Episode {
            title: "Test Episode".to_string(),
            sanitized_title: "Test Episode".to_string(),
            media_url: Url::parse("https://example.com/episode.mp3").unwrap(),
            summary: None,
            pub_date: None,
        }
    }

    #[tokio::test]
    async fn download_writes_file() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("episode.mp3");

        let client = MockHttpClient {
            response_data: b"test audio content".to_vec(),
            status: 200,
        };

        let episode = make_episode();
        let reporter = NoopReporter::shared();

        let bytes = download_media(&client, &episode, &output_path, &reporter)
            .await
            .unwrap();

        assert_eq!(bytes, 18); // "test audio content".len()
        assert!(output_path.exists());

        let content = std::fs::read(&output_path).unwrap();
        assert_eq!(content, b"test audio content");
    }

    #[tokio::test]
    async fn download_fails_on_http_error() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("episode.mp3");

        let client = MockHttpClient {
            response_data: b"Not Found".to_vec(),
            status: 404,
        };

        let episode = make_episode();
        let reporter = NoopReporter::shared();

        let result = download_media(&client, &episode, &output_path, &reporter).await;

        match result.unwrap_err() {
            DownloadError::HttpStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn download_does_not_write_body_on_http_error() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("episode.mp3");

        let client = MockHttpClient {
            response_data: b"<html>404</html>".to_vec(),
            status: 404,
        };

        let episode = make_episode();
        let reporter = NoopReporter::shared();

        let _ = download_media(&client, &episode, &output_path, &reporter).await;

        // The file is created before the request, but no body bytes land in it
        let content = std::fs::read(&output_path).unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn download_fails_on_unwritable_path() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("no-such-subdir").join("episode.mp3");

        let client = MockHttpClient {
            response_data: b"audio".to_vec(),
            status: 200,
        };

        let episode = make_episode();
        let reporter = NoopReporter::shared();

        let result = download_media(&client, &episode, &output_path, &reporter).await;
        assert!(matches!(
            result,
            Err(DownloadError::FileCreateFailed { .. })
        ));
    }
}
