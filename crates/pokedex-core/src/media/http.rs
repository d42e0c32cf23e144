use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE};
use reqwest::Client;

use super::probe::{LoadOutcome, MediaHandle, MediaLoader};

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "oga", "wav", "m4a", "aac", "flac", "opus", "webm"];

/// Loads a candidate over HTTP and judges playability from the response head.
///
/// Only the first two bytes are requested; the body is never read.
#[derive(Debug, Clone, Default)]
pub struct HttpMediaLoader {
    http: Client,
}

impl HttpMediaLoader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

impl MediaLoader for HttpMediaLoader {
    async fn load(&self, url: &str) -> LoadOutcome {
        let resp = match self.http.get(url).header(RANGE, "bytes=0-1").send().await {
            Ok(resp) => resp,
            Err(e) => return LoadOutcome::Failed(e.to_string()),
        };

        let status = resp.status();
        if !status.is_success() {
            return LoadOutcome::Failed(format!("HTTP {}", status.as_u16()));
        }

        let headers = resp.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !is_playable(content_type.as_deref(), url) {
            return LoadOutcome::Failed(format!(
                "not audio: {}",
                content_type.as_deref().unwrap_or("unknown content type")
            ));
        }

        let content_length = headers
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(total_from_content_range)
            .or_else(|| {
                headers
                    .get(CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .filter(|_| status != reqwest::StatusCode::PARTIAL_CONTENT)
            });

        LoadOutcome::Playable(MediaHandle {
            content_type,
            content_length,
            ..MediaHandle::new(url)
        })
    }
}

/// Audio MIME types pass; anything else fails. A response without a content
/// type falls back to the URL's file extension.
pub fn is_playable(content_type: Option<&str>, url: &str) -> bool {
    match content_type {
        Some(raw) => {
            let mime = raw
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            mime.starts_with("audio/") || mime == "application/ogg"
        }
        None => url::Url::parse(url)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut s| s.next_back())
                    .and_then(|file| file.rsplit_once('.'))
                    .map(|(_, ext)| ext.to_ascii_lowercase())
            })
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str())),
    }
}

/// `bytes 0-1/5120` → `5120`.
fn total_from_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/').and_then(|(_, total)| total.parse().ok())
}
