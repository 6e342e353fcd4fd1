//! # versepin
//!
//! Turn a photographed or designed Malayalam Bible-verse card into a
//! Pinterest pin: a vision model reads the verse and translates it, a
//! person reviews the result, and the pin is published with branding,
//! alt text and a promotional link.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Load     read bytes, sniff JPEG/PNG, size
//!  ├─ 2. Extract  one vision-LLM call (Gemini) with the extraction prompt
//!  ├─ 3. Parse    strip ```json fences, repair trailing commas, pick 5 keys
//!  ├─ 4. Format   brand the title, compose description, normalise confidence
//!  ├─ 5. Review   human edits; gate re-run on approval
//!  └─ 6. Publish  one POST /v5/pins with the base64 image
//! ```
//!
//! The two network steps sit behind the [`Extractor`] and [`Publisher`]
//! traits, so everything between them is testable without a network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use versepin::{PipelineConfig, Workflow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // GEMINI_API_KEY, PINTEREST_ACCESS_TOKEN, PINTEREST_BOARD_ID from the environment
//!     let config = PipelineConfig::from_env().build()?;
//!     let workflow = Workflow::from_config(config)?;
//!
//!     let mut draft = workflow.extract("verse.jpg").await?;
//!     for w in draft.warnings() {
//!         eprintln!("warning: {w}");
//!     }
//!     draft.set_alt_text("Malayalam verse card with a sunrise background");
//!
//!     let approved = draft.approve()?;
//!     let pin = workflow.publish(&approved).await?;
//!     println!("created pin {:?}", pin.pin_id());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `versepin` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod record;
pub mod review;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Destination, PipelineConfig, PipelineConfigBuilder};
pub use error::{FormattingWarning, VersePinError};
pub use pipeline::encode::{image_from_bytes, load_image, ImageInfo, SourceImage};
pub use pipeline::extract::{Extractor, FixedReply, GeminiExtractor};
pub use pipeline::format::{format_record, split_description, Formatted, VerseParts};
pub use pipeline::gate::{
    all_fields_valid, can_publish, confidence_acceptable, field_errors, field_validation,
    rejection_reasons, FieldError, FieldValidation,
};
pub use pipeline::parse::parse_reply;
pub use pipeline::publish::{PinterestPublisher, Publisher};
pub use progress::{NoopProgressCallback, ProgressCallback, WorkflowProgressCallback, WorkflowStep};
pub use record::{
    Confidence, ExtractedFields, MediaSource, PublishConfirmation, PublishPayload, PublishRecord,
    RawExtraction,
};
pub use review::{ApprovedRecord, DraftRecord, NotApproved, RecordEdit};
pub use workflow::{extract_sync, RunOutcome, Workflow};
