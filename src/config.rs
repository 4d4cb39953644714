//! Configuration for mantra extraction and synthesis.
//!
//! Every knob lives in [`ProcessingConfig`], built via its
//! [`ProcessingConfigBuilder`]. The builder lets callers set only what they
//! care about and rely on the documented defaults for the rest.

use crate::error::Mantra2AudioError;
use crate::progress::ProgressCallback;
use crate::tts::{GoogleTranslateTts, SpeechSynthesizer};
use std::fmt;
use std::sync::Arc;

/// Configuration for one processing run.
///
/// Built via [`ProcessingConfig::builder()`] or using
/// [`ProcessingConfig::default()`].
///
/// # Example
/// ```rust
/// use mantra2audio::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .language("ro")
///     .min_body_chars(8)
///     .synthesis_delay_ms(500)
///     .build()
///     .unwrap();
/// assert_eq!(config.min_body_chars, 8);
/// ```
#[derive(Clone)]
pub struct ProcessingConfig {
    /// Fill colour (`0xRRGGBB`) of the text worth reading. Default: `0` (black).
    ///
    /// Catalogue PDFs print the mantra and its heading in black and use colour
    /// for commentary, page furniture and alternative transliterations.
    pub ink_color: u32,

    /// Language tag handed to the synthesizer. Default: `"ro"`.
    ///
    /// Romanian orthography covers most Sanskrit sounds once the phonetic
    /// mapper has rewritten the diacritics.
    pub language: String,

    /// Shortest body, in characters, that survives the post-filter. Default: 5.
    pub min_body_chars: usize,

    /// Pause after each successful synthesis call, in milliseconds. Default: 1000.
    ///
    /// The public TTS endpoint throttles aggressively; one request per second
    /// stays under its limits.
    pub synthesis_delay_ms: u64,

    /// HTTP(S) proxy for the default synthesizer. Default: none.
    pub proxy: Option<String>,

    /// Per-request timeout of the default synthesizer in seconds. Default: 30.
    pub request_timeout_secs: u64,

    /// Longest text sent in one TTS request. Default: 100.
    pub max_request_chars: usize,

    /// Produce audio files at all. Default: true.
    ///
    /// With `false` only the report is written, which is handy for tuning the
    /// segmentation on a new catalogue.
    pub synthesize_audio: bool,

    /// In folder mode, give every PDF its own output subdirectory. Default: true.
    pub subdir_per_document: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Report file name inside the output directory. Default: `processed_content.txt`.
    pub report_file_name: String,

    /// Audio file extension. Default: `mp3`.
    pub audio_extension: String,

    /// Pre-constructed synthesizer. Takes precedence over the default
    /// Google Translate backend.
    pub synthesizer: Option<Arc<dyn SpeechSynthesizer>>,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            ink_color: 0,
            language: "ro".to_string(),
            min_body_chars: 5,
            synthesis_delay_ms: 1000,
            proxy: None,
            request_timeout_secs: 30,
            max_request_chars: 100,
            synthesize_audio: true,
            subdir_per_document: true,
            password: None,
            report_file_name: "processed_content.txt".to_string(),
            audio_extension: "mp3".to_string(),
            synthesizer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProcessingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingConfig")
            .field("ink_color", &format_args!("{:#08x}", self.ink_color))
            .field("language", &self.language)
            .field("min_body_chars", &self.min_body_chars)
            .field("synthesis_delay_ms", &self.synthesis_delay_ms)
            .field("proxy", &self.proxy)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_request_chars", &self.max_request_chars)
            .field("synthesize_audio", &self.synthesize_audio)
            .field("subdir_per_document", &self.subdir_per_document)
            .field("report_file_name", &self.report_file_name)
            .field("audio_extension", &self.audio_extension)
            .field(
                "synthesizer",
                &self.synthesizer.as_ref().map(|s| s.name().to_string()),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ProcessingProgressCallback>"),
            )
            .finish()
    }
}

impl ProcessingConfig {
    /// Create a new builder for `ProcessingConfig`.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder {
            config: Self::default(),
        }
    }

    /// The configured synthesizer, or a freshly built Google Translate client.
    pub fn resolve_synthesizer(&self) -> Result<Arc<dyn SpeechSynthesizer>, Mantra2AudioError> {
        if let Some(synth) = &self.synthesizer {
            return Ok(Arc::clone(synth));
        }
        let tts = GoogleTranslateTts::new(
            self.proxy.as_deref(),
            self.request_timeout_secs,
            self.max_request_chars,
        )?;
        Ok(Arc::new(tts))
    }
}

/// Builder for [`ProcessingConfig`].
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl fmt::Debug for ProcessingConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ProcessingConfigBuilder {
    pub fn ink_color(mut self, color: u32) -> Self {
        self.config.ink_color = color;
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn min_body_chars(mut self, n: usize) -> Self {
        self.config.min_body_chars = n;
        self
    }

    pub fn synthesis_delay_ms(mut self, ms: u64) -> Self {
        self.config.synthesis_delay_ms = ms;
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy = Some(url.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn max_request_chars(mut self, n: usize) -> Self {
        self.config.max_request_chars = n;
        self
    }

    pub fn synthesize_audio(mut self, v: bool) -> Self {
        self.config.synthesize_audio = v;
        self
    }

    pub fn subdir_per_document(mut self, v: bool) -> Self {
        self.config.subdir_per_document = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn report_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.report_file_name = name.into();
        self
    }

    pub fn audio_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.audio_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn synthesizer(mut self, synth: Arc<dyn SpeechSynthesizer>) -> Self {
        self.config.synthesizer = Some(synth);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessingConfig, Mantra2AudioError> {
        let c = &self.config;
        if c.ink_color > 0xFF_FFFF {
            return Err(Mantra2AudioError::InvalidConfig(format!(
                "ink colour must be a 24-bit RGB value, got {:#x}",
                c.ink_color
            )));
        }
        if c.language.trim().is_empty() {
            return Err(Mantra2AudioError::InvalidConfig(
                "language tag must not be empty".into(),
            ));
        }
        if c.min_body_chars == 0 {
            return Err(Mantra2AudioError::InvalidConfig(
                "min_body_chars must be ≥ 1".into(),
            ));
        }
        if c.max_request_chars == 0 {
            return Err(Mantra2AudioError::InvalidConfig(
                "max_request_chars must be ≥ 1".into(),
            ));
        }
        if c.request_timeout_secs == 0 {
            return Err(Mantra2AudioError::InvalidConfig(
                "request_timeout_secs must be ≥ 1".into(),
            ));
        }
        if !is_plain_file_name(&c.report_file_name) {
            return Err(Mantra2AudioError::InvalidConfig(format!(
                "report file name must be a bare file name, got '{}'",
                c.report_file_name
            )));
        }
        if let Some(ref url) = c.proxy {
            reqwest::Proxy::all(url.as_str()).map_err(|e| {
                Mantra2AudioError::InvalidConfig(format!("invalid proxy '{}': {}", url, e))
            })?;
        }
        let ext = &c.audio_extension;
        if ext.is_empty() || !ext.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(Mantra2AudioError::InvalidConfig(format!(
                "audio extension must be alphanumeric, got '{}'",
                c.audio_extension
            )));
        }
        Ok(self.config)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documentation() {
        let c = ProcessingConfig::default();
        assert_eq!(c.ink_color, 0);
        assert_eq!(c.language, "ro");
        assert_eq!(c.min_body_chars, 5);
        assert_eq!(c.synthesis_delay_ms, 1000);
        assert_eq!(c.max_request_chars, 100);
        assert_eq!(c.report_file_name, "processed_content.txt");
        assert_eq!(c.audio_extension, "mp3");
        assert!(c.synthesize_audio);
        assert!(c.subdir_per_document);
        assert!(c.proxy.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = ProcessingConfig::builder()
            .ink_color(0x0000FF)
            .language("hi")
            .proxy("http://127.0.0.1:7890")
            .audio_extension(".ogg")
            .synthesize_audio(false)
            .build()
            .unwrap();
        assert_eq!(c.ink_color, 0x0000FF);
        assert_eq!(c.language, "hi");
        assert_eq!(c.proxy.as_deref(), Some("http://127.0.0.1:7890"));
        assert_eq!(c.audio_extension, "ogg");
        assert!(!c.synthesize_audio);
    }

    #[test]
    fn builder_rejects_invalid_values() {
        assert!(ProcessingConfig::builder().ink_color(0x1_000_000).build().is_err());
        assert!(ProcessingConfig::builder().language(" ").build().is_err());
        assert!(ProcessingConfig::builder().min_body_chars(0).build().is_err());
        assert!(ProcessingConfig::builder().max_request_chars(0).build().is_err());
        assert!(ProcessingConfig::builder()
            .report_file_name("../escape.txt")
            .build()
            .is_err());
        assert!(ProcessingConfig::builder().audio_extension("m p3").build().is_err());
    }

    #[test]
    fn bad_proxy_fails_at_build_time() {
        let err = ProcessingConfig::builder()
            .proxy("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Mantra2AudioError::InvalidConfig(ref m) if m.contains("proxy")));

        assert!(ProcessingConfig::builder()
            .proxy("http://127.0.0.1:7890")
            .build()
            .is_ok());
    }

    #[test]
    fn debug_hides_trait_objects() {
        let dbg = format!("{:?}", ProcessingConfig::default());
        assert!(dbg.contains("ProcessingConfig"));
        assert!(dbg.contains("0x000000"));
    }

    #[test]
    fn resolves_default_synthesizer() {
        let synth = ProcessingConfig::default().resolve_synthesizer().unwrap();
        assert_eq!(synth.name(), "google-translate");
    }
}
