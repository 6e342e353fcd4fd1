//! Configuration for the extraction-to-publication pipeline.
//!
//! Everything the pipeline needs (credentials, model choice, endpoints,
//! timeouts) lives in one [`PipelineConfig`] value, built once at start-up
//! and passed by reference to the components that need it. There are no
//! module-level defaults to mutate.
//!
//! Environment variables seed the builder ([`PipelineConfig::from_env`]);
//! explicit setter calls override them, which is how a front end supplies
//! values typed by the user.

use crate::error::VersePinError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Default promotional link attached to every pin.
pub const DEFAULT_PROMO_LINK: &str = "https://whatsapp.com/channel/0029VbAhLis0rGiVQd0HSw03";

/// Pin-creation endpoint of the Pinterest v5 API.
pub const DEFAULT_PUBLISH_ENDPOINT: &str = "https://api.pinterest.com/v5/pins";

/// Default Gemini model used for extraction.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_PINTEREST_ACCESS_TOKEN: &str = "PINTEREST_ACCESS_TOKEN";
pub const ENV_PINTEREST_BOARD_ID: &str = "PINTEREST_BOARD_ID";
pub const ENV_PROMO_LINK: &str = "WHATSAPP_LINK";
pub const ENV_MODEL: &str = "VERSEPIN_MODEL";

/// Configuration for one or more workflow runs.
///
/// Built via [`PipelineConfig::builder()`] or [`PipelineConfig::from_env()`].
///
/// # Example
/// ```rust
/// use versepin::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .gemini_api_key("key")
///     .pinterest_access_token("token")
///     .pinterest_board_id("123456")
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gemini-2.5-flash");
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Gemini API key. Required unless `provider` is set.
    pub gemini_api_key: Option<String>,

    /// Pinterest OAuth access token, sent as a bearer token.
    pub pinterest_access_token: Option<String>,

    /// Destination board for new pins.
    pub pinterest_board_id: Option<String>,

    /// Link attached to the pin. Default: [`DEFAULT_PROMO_LINK`].
    pub promo_link: String,

    /// Vision model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Pre-constructed LLM provider. Takes precedence over `gemini_api_key`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for extraction. Default: 0.1.
    ///
    /// Transcription wants the model to copy, not to invent.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2048.
    pub max_tokens: usize,

    /// Extraction call timeout in seconds. Default: 60.
    pub extraction_timeout_secs: u64,

    /// Publish request timeout in seconds. Default: 30.
    pub publish_timeout_secs: u64,

    /// Pin-creation URL. Default: [`DEFAULT_PUBLISH_ENDPOINT`].
    pub publish_endpoint: String,

    /// Custom extraction prompt. If None, uses [`crate::prompts::DEFAULT_EXTRACTION_PROMPT`].
    pub extraction_prompt: Option<String>,

    /// Receives step-level progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            pinterest_access_token: None,
            pinterest_board_id: None,
            promo_link: DEFAULT_PROMO_LINK.to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider: None,
            temperature: 0.1,
            max_tokens: 2048,
            extraction_timeout_secs: 60,
            publish_timeout_secs: 30,
            publish_endpoint: DEFAULT_PUBLISH_ENDPOINT.to_string(),
            extraction_prompt: None,
            progress_callback: None,
        }
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "<set>",
        _ => "<unset>",
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("pinterest_access_token", &redact(&self.pinterest_access_token))
            .field("pinterest_board_id", &self.pinterest_board_id)
            .field("promo_link", &self.promo_link)
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("extraction_timeout_secs", &self.extraction_timeout_secs)
            .field("publish_timeout_secs", &self.publish_timeout_secs)
            .field("publish_endpoint", &self.publish_endpoint)
            .field("progress_callback", &self.progress_callback.as_ref().map(|_| "<dyn WorkflowProgressCallback>"))
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder starting from the built-in defaults.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Create a builder seeded from the process environment.
    pub fn from_env() -> PipelineConfigBuilder {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a builder seeded from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PipelineConfigBuilder {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();
        builder.config.gemini_api_key = get(ENV_GEMINI_API_KEY);
        builder.config.pinterest_access_token = get(ENV_PINTEREST_ACCESS_TOKEN);
        builder.config.pinterest_board_id = get(ENV_PINTEREST_BOARD_ID);
        if let Some(link) = get(ENV_PROMO_LINK) {
            builder.config.promo_link = link;
        }
        if let Some(model) = get(ENV_MODEL) {
            builder.config.model = model;
        }
        builder
    }

    /// The publishing destination, or a configuration error naming what is
    /// missing.
    pub fn destination(&self) -> Result<Destination, VersePinError> {
        let destination = Destination {
            board_id: self.pinterest_board_id.clone().unwrap_or_default(),
            access_token: self.pinterest_access_token.clone().unwrap_or_default(),
        };
        destination.validate()?;
        Ok(destination)
    }

    /// The Gemini key, or a configuration error if it is missing.
    pub fn require_gemini_api_key(&self) -> Result<&str, VersePinError> {
        match self.gemini_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(VersePinError::Configuration(format!(
                "{ENV_GEMINI_API_KEY} is required."
            ))),
        }
    }
}

/// Builder for [`PipelineConfig`].
///
/// String setters ignore blank input so an empty form field never replaces
/// a value taken from the environment.
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}

impl PipelineConfigBuilder {
    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        if let Some(key) = non_blank(key) {
            self.config.gemini_api_key = Some(key);
        }
        self
    }

    pub fn pinterest_access_token(mut self, token: impl Into<String>) -> Self {
        if let Some(token) = non_blank(token) {
            self.config.pinterest_access_token = Some(token);
        }
        self
    }

    pub fn pinterest_board_id(mut self, board_id: impl Into<String>) -> Self {
        if let Some(board_id) = non_blank(board_id) {
            self.config.pinterest_board_id = Some(board_id);
        }
        self
    }

    pub fn promo_link(mut self, link: impl Into<String>) -> Self {
        if let Some(link) = non_blank(link) {
            self.config.promo_link = link;
        }
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        if let Some(model) = non_blank(model) {
            self.config.model = model;
        }
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn extraction_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extraction_timeout_secs = secs;
        self
    }

    pub fn publish_timeout_secs(mut self, secs: u64) -> Self {
        self.config.publish_timeout_secs = secs;
        self
    }

    pub fn publish_endpoint(mut self, url: impl Into<String>) -> Self {
        if let Some(url) = non_blank(url) {
            self.config.publish_endpoint = url;
        }
        self
    }

    pub fn extraction_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.extraction_prompt = non_blank(prompt);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Credentials are not required here; they are checked by the step that
    /// needs them, before it makes any network call.
    pub fn build(self) -> Result<PipelineConfig, VersePinError> {
        let c = &self.config;
        if c.extraction_timeout_secs == 0 || c.publish_timeout_secs == 0 {
            return Err(VersePinError::Configuration(
                "Timeouts must be ≥ 1 second".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(VersePinError::Configuration(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if !is_http_url(&c.publish_endpoint) {
            return Err(VersePinError::Configuration(format!(
                "Publish endpoint must be an http(s) URL, got '{}'",
                c.publish_endpoint
            )));
        }
        if !is_http_url(&c.promo_link) {
            return Err(VersePinError::Configuration(format!(
                "Promotional link must be an http(s) URL, got '{}'",
                c.promo_link
            )));
        }
        Ok(self.config)
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Where a pin goes and the token that authorises it.
#[derive(Clone, PartialEq, Eq)]
pub struct Destination {
    pub board_id: String,
    pub access_token: String,
}

impl Destination {
    pub fn new(board_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Both the token and the board id must be non-blank.
    pub fn validate(&self) -> Result<(), VersePinError> {
        if self.access_token.trim().is_empty() {
            return Err(VersePinError::Configuration(
                "Pinterest Access Token is required.".into(),
            ));
        }
        if self.board_id.trim().is_empty() {
            return Err(VersePinError::Configuration(
                "Pinterest Board ID is required.".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("board_id", &self.board_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
