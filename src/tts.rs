//! Speech synthesis seam.
//!
//! The orchestrator only knows [`SpeechSynthesizer`]: hand it text, a
//! language tag and a destination path, and it either persists encoded audio
//! there or reports a [`SynthesisError`]. [`GoogleTranslateTts`] is the
//! default backend; tests and embedders plug in their own.

use crate::error::{Mantra2AudioError, SynthesisError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Public Google Translate text-to-speech endpoint.
pub const GOOGLE_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// A text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` spoken in `language` and write the audio to `output_path`.
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        output_path: &Path,
    ) -> Result<(), SynthesisError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// MP3 synthesis through the Google Translate TTS endpoint.
///
/// The endpoint caps each request at roughly a hundred characters, so longer
/// text is split on whitespace and the returned MP3 frames are concatenated.
#[derive(Debug, Clone)]
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    endpoint: String,
    max_request_chars: usize,
}

impl GoogleTranslateTts {
    /// Build a client with an optional HTTP(S) proxy and a per-request timeout.
    pub fn new(
        proxy: Option<&str>,
        timeout_secs: u64,
        max_request_chars: usize,
    ) -> Result<Self, Mantra2AudioError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT);

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                Mantra2AudioError::SynthesizerUnavailable(format!(
                    "invalid proxy '{}': {}",
                    proxy_url, e
                ))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Mantra2AudioError::SynthesizerUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: GOOGLE_TTS_ENDPOINT.to_string(),
            max_request_chars: max_request_chars.max(1),
        })
    }

    /// Point the client at a different endpoint (self-hosted mirror, test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, SynthesisError> {
        let total_s = total.to_string();
        let idx_s = idx.to_string();
        let len_s = chunk.chars().count().to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language),
                ("total", total_s.as_str()),
                ("idx", idx_s.as_str()),
                ("textlen", len_s.as_str()),
                ("client", "tw-ob"),
            ])
            .send()
            .await
            .map_err(|e| SynthesisError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        output_path: &Path,
    ) -> Result<(), SynthesisError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let chunks = split_text(text, self.max_request_chars);
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            debug!("TTS request {}/{} ({} chars)", idx + 1, chunks.len(), chunk.chars().count());
            audio.extend(self.fetch_chunk(chunk, language, idx, chunks.len()).await?);
        }

        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        tokio::fs::write(output_path, &audio)
            .await
            .map_err(|source| SynthesisError::Write {
                path: output_path.to_path_buf(),
                source,
            })
    }

    fn name(&self) -> &str {
        "google-translate"
    }
}

/// Split `text` into whitespace-delimited chunks of at most `max_chars` characters.
///
/// A single word longer than the limit is cut at character boundaries.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_text("om vajra svaha", 100), vec!["om vajra svaha"]);
    }

    #[test]
    fn splits_on_word_boundaries() {
        let chunks = split_text("om mani padme hum", 9);
        assert_eq!(chunks, vec!["om mani", "padme hum"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 9));
    }

    #[test]
    fn long_word_is_cut() {
        let chunks = split_text("ab abcdefgh cd", 3);
        assert_eq!(chunks, vec!["ab", "abc", "def", "gh", "cd"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let chunks = split_text("ușnișa ușnișa", 6);
        assert_eq!(chunks, vec!["ușnișa", "ușnișa"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_text("   ", 10).is_empty());
    }

    #[test]
    fn rejects_bad_proxy() {
        let err = GoogleTranslateTts::new(Some("not a url"), 5, 100).unwrap_err();
        assert!(matches!(err, Mantra2AudioError::SynthesizerUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_text_is_refused_without_network() {
        let tts = GoogleTranslateTts::new(None, 5, 100).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = tts
            .synthesize("  ", "ro", &dir.path().join("x.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::EmptyText));
        assert!(!dir.path().join("x.mp3").exists());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let tts = GoogleTranslateTts::new(None, 2, 100)
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/translate_tts");
        let dir = tempfile::tempdir().unwrap();
        let err = tts
            .synthesize("om", "ro", &dir.path().join("x.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Request(_)), "{err:?}");
    }
}
