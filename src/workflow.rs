//! Workflow orchestration: image → draft → (review) → approved → pin.
//!
//! [`Workflow`] owns no business rules. It sequences the pipeline stages,
//! reports progress, and stops at the first failure, handing that failure to
//! the caller unchanged. Nothing is retried.
//!
//! Two entry points cover the two ways a front end drives it:
//!
//! * step by step: [`Workflow::extract`] returns a [`DraftRecord`] for the
//!   user to edit; [`DraftRecord::approve`] runs the gate;
//!   [`Workflow::publish`] sends the [`ApprovedRecord`].
//! * in one go: [`Workflow::run`] with a review closure.

use crate::config::PipelineConfig;
use crate::error::VersePinError;
use crate::pipeline::encode::{self, SourceImage};
use crate::pipeline::extract::{Extractor, GeminiExtractor};
use crate::pipeline::publish::{PinterestPublisher, Publisher};
use crate::pipeline::{format, parse};
use crate::progress::WorkflowStep;
use crate::record::{PublishConfirmation, RawExtraction};
use crate::review::{ApprovedRecord, DraftRecord};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a complete [`Workflow::run`].
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub approved: ApprovedRecord,
    pub confirmation: PublishConfirmation,
}

/// Sequences extraction, formatting, gating and publishing.
pub struct Workflow {
    config: PipelineConfig,
    extractor: Arc<dyn Extractor>,
    publisher: Arc<dyn Publisher>,
}

impl Workflow {
    /// Build the production workflow: Gemini extraction, Pinterest publishing.
    ///
    /// Fails with [`VersePinError::Configuration`] when no AI credential is
    /// available. Publishing credentials are checked later, at publish time,
    /// so extraction alone works without them.
    pub fn from_config(config: PipelineConfig) -> Result<Self, VersePinError> {
        let extractor = GeminiExtractor::from_config(&config)?;
        let publisher = PinterestPublisher::from_config(&config)?;
        Ok(Self::new(config, Arc::new(extractor), Arc::new(publisher)))
    }

    /// Build a workflow around caller-supplied collaborators.
    pub fn new(
        config: PipelineConfig,
        extractor: Arc<dyn Extractor>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            config,
            extractor,
            publisher,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the image, extract, parse and format. The result is a draft for
    /// review; nothing has been published.
    pub async fn extract(&self, image_path: impl AsRef<Path>) -> Result<DraftRecord, VersePinError> {
        let image_path = image_path.as_ref();
        info!("Processing image: {}", image_path.display());

        let image = self
            .step(WorkflowStep::LoadImage, encode::load_image(image_path))
            .await?;

        info!("Extracting text with {}", self.extractor.name());
        let raw = self
            .step(WorkflowStep::Extract, self.extractor.extract(&image))
            .await?;

        self.step(WorkflowStep::Format, async { self.draft_from_reply(&raw, image) })
            .await
    }

    /// Parse and format a reply that was already obtained.
    pub fn draft_from_reply(
        &self,
        raw: &RawExtraction,
        image: SourceImage,
    ) -> Result<DraftRecord, VersePinError> {
        let fields = parse::parse_reply(raw)?;
        let formatted = format::format_record(&fields);
        if let Some(ref cb) = self.config.progress_callback {
            for w in &formatted.warnings {
                cb.on_warning(w);
            }
        }
        Ok(DraftRecord::new(formatted.record, image, formatted.warnings))
    }

    /// Publish an approved record to the configured destination.
    ///
    /// The destination credentials are validated before the publisher is
    /// invoked, so a missing token never reaches the network. The uploaded
    /// bytes are the ones extraction saw; the file is not read again.
    pub async fn publish(
        &self,
        approved: &ApprovedRecord,
    ) -> Result<PublishConfirmation, VersePinError> {
        self.step(WorkflowStep::Publish, async {
            let destination = self.config.destination()?;
            self.publisher
                .publish(approved.image(), approved.record(), &destination)
                .await
        })
        .await
    }

    /// The whole pipeline. `review` may edit the draft; the gate runs on the
    /// result, and only a passing record is published.
    pub async fn run<F>(
        &self,
        image_path: impl AsRef<Path>,
        review: F,
    ) -> Result<RunOutcome, VersePinError>
    where
        F: FnOnce(&mut DraftRecord),
    {
        let mut draft = self.extract(image_path).await?;
        review(&mut draft);

        let approved = draft.approve().map_err(|refused| {
            warn!("Not publishing: {}", refused.reasons.join("; "));
            VersePinError::from(refused)
        })?;

        let confirmation = self.publish(&approved).await?;
        Ok(RunOutcome {
            approved,
            confirmation,
        })
    }

    /// Report start/complete/error for one step around `fut`.
    async fn step<T>(
        &self,
        step: WorkflowStep,
        fut: impl std::future::Future<Output = Result<T, VersePinError>>,
    ) -> Result<T, VersePinError> {
        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_step_start(step);
        }
        let result = fut.await;
        if let Some(cb) = cb {
            match &result {
                Ok(_) => cb.on_step_complete(step),
                Err(e) => cb.on_step_error(step, &e.to_string()),
            }
        }
        result
    }
}

/// Synchronous wrapper around [`Workflow::extract`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn extract_sync(
    workflow: &Workflow,
    image_path: impl AsRef<Path>,
) -> Result<DraftRecord, VersePinError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| VersePinError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(workflow.extract(image_path))
}
