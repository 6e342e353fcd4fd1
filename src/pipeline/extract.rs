//! AI extraction: send the image and the prompt, get the reply text back.
//!
//! The pipeline only depends on the [`Extractor`] trait. [`GeminiExtractor`]
//! is the production implementation on top of `edgequake-llm`;
//! [`FixedReply`] replays a stored reply, which is how a saved reply can be
//! re-processed offline and how tests drive the pipeline without a network.
//!
//! There is no retry loop here. A failed call surfaces as
//! [`VersePinError::Extraction`] and the caller decides what to do.

use crate::config::PipelineConfig;
use crate::error::VersePinError;
use crate::pipeline::encode::SourceImage;
use crate::prompts::DEFAULT_EXTRACTION_PROMPT;
use crate::record::RawExtraction;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, GeminiProvider, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

/// Turns an image into the model's raw text reply.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short identifier for logs, e.g. "gemini".
    fn name(&self) -> &str;

    /// Run one extraction. Exactly one request per call.
    async fn extract(&self, image: &SourceImage) -> Result<RawExtraction, VersePinError>;
}

/// Vision-LLM extractor (Gemini by default).
pub struct GeminiExtractor {
    provider: Arc<dyn LLMProvider>,
    prompt: String,
    options: CompletionOptions,
    timeout_secs: u64,
}

impl GeminiExtractor {
    /// Resolve the provider from the configuration.
    ///
    /// A pre-built provider wins. Otherwise a Gemini provider is built from
    /// the configured key, so a missing credential fails before any call is
    /// made and the process environment is never consulted here.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, VersePinError> {
        let provider: Arc<dyn LLMProvider> = match config.provider {
            Some(ref provider) => Arc::clone(provider),
            None => {
                let key = config.require_gemini_api_key()?;
                Arc::new(GeminiProvider::new(key).with_model(&config.model))
            }
        };
        Ok(Self::with_provider(provider, config))
    }

    /// Wrap an already constructed provider.
    pub fn with_provider(provider: Arc<dyn LLMProvider>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            prompt: config
                .extraction_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTRACTION_PROMPT.to_string()),
            options: build_options(config),
            timeout_secs: config.extraction_timeout_secs,
        }
    }

    /// Model the provider will be asked to run.
    pub fn model(&self) -> &str {
        self.provider.model()
    }
}

#[async_trait]
impl Extractor for GeminiExtractor {
    fn name(&self) -> &str {
        "gemini"
    }

    /// The request is a single user turn carrying the prompt text and the
    /// image attachment.
    async fn extract(&self, image: &SourceImage) -> Result<RawExtraction, VersePinError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user_with_images(
            self.prompt.as_str(),
            vec![image.to_image_data()],
        )];

        let call = self.provider.chat(&messages, Some(&self.options));
        let response = timeout(Duration::from_secs(self.timeout_secs), call)
            .await
            .map_err(|_| VersePinError::Extraction {
                message: format!("Gemini API call timed out after {}s", self.timeout_secs),
            })?
            .map_err(|e| VersePinError::Extraction {
                message: format!("Error during Gemini API call: {e}"),
            })?;

        debug!(
            "Extraction: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        if response.content.trim().is_empty() {
            return Err(VersePinError::Extraction {
                message: "Failed to extract text from image (empty reply)".into(),
            });
        }

        info!("Extracted {} chars of reply text", response.content.len());
        Ok(RawExtraction::new(response.content))
    }
}

/// Build `CompletionOptions` from the pipeline config.
fn build_options(config: &PipelineConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Replays a stored reply instead of calling a model.
#[derive(Debug, Clone)]
pub struct FixedReply {
    reply: String,
}

impl FixedReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }

    /// Load a reply previously saved to disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, VersePinError> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map(Self::new)
            .map_err(|e| VersePinError::Extraction {
                message: format!("Failed to read saved reply '{}': {e}", path.display()),
            })
    }
}

#[async_trait]
impl Extractor for FixedReply {
    fn name(&self) -> &str {
        "fixed-reply"
    }

    async fn extract(&self, _image: &SourceImage) -> Result<RawExtraction, VersePinError> {
        if self.reply.trim().is_empty() {
            return Err(VersePinError::Extraction {
                message: "Failed to extract text from image (empty reply)".into(),
            });
        }
        Ok(RawExtraction::new(self.reply.clone()))
    }
}
