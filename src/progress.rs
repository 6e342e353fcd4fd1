//! Progress-callback trait for workflow step events.
//!
//! Inject an [`Arc<dyn WorkflowProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to hear about
//! each step as the workflow runs it. A terminal spinner, a log line, or a
//! web UI status field can all sit behind the same trait.
//!
//! # Example
//!
//! ```rust
//! use versepin::{PipelineConfig, WorkflowProgressCallback, WorkflowStep};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl WorkflowProgressCallback for Printer {
//!     fn on_step_start(&self, step: WorkflowStep) {
//!         eprintln!("{} ({}%)", step.label(), step.percent());
//!     }
//! }
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::FormattingWarning;
use std::fmt;
use std::sync::Arc;

/// The observable steps of one workflow run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStep {
    LoadImage,
    Extract,
    Format,
    Publish,
}

impl WorkflowStep {
    /// Short status line for the step.
    pub fn label(self) -> &'static str {
        match self {
            WorkflowStep::LoadImage => "Loading image…",
            WorkflowStep::Extract => "Extracting text with AI…",
            WorkflowStep::Format => "Formatting extracted data…",
            WorkflowStep::Publish => "Uploading to Pinterest…",
        }
    }

    /// Rough completion percentage when the step starts.
    pub fn percent(self) -> u8 {
        match self {
            WorkflowStep::LoadImage => 20,
            WorkflowStep::Extract => 40,
            WorkflowStep::Format => 70,
            WorkflowStep::Publish => 90,
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::LoadImage => "load-image",
            WorkflowStep::Extract => "extract",
            WorkflowStep::Format => "format",
            WorkflowStep::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Called by the workflow as it moves through its steps.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Steps run one after another, never concurrently.
pub trait WorkflowProgressCallback: Send + Sync {
    /// Called just before a step starts.
    fn on_step_start(&self, step: WorkflowStep) {
        let _ = step;
    }

    /// Called after a step finished successfully.
    fn on_step_complete(&self, step: WorkflowStep) {
        let _ = step;
    }

    /// Called after a step failed; the run stops here.
    fn on_step_error(&self, step: WorkflowStep, error: &str) {
        let _ = (step, error);
    }

    /// Called for every non-fatal formatting warning.
    fn on_warning(&self, warning: &FormattingWarning) {
        let _ = warning;
    }
}

/// Shared handle to a progress callback.
pub type ProgressCallback = Arc<dyn WorkflowProgressCallback>;

/// A callback that ignores every event.
pub struct NoopProgressCallback;

impl WorkflowProgressCallback for NoopProgressCallback {}
