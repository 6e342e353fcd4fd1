//! Human review: a record is a [`DraftRecord`] until someone approves it.
//!
//! ```text
//!            edit*                approve() ── gate passes ──▶ ApprovedRecord
//! Draft ◀──────────┐                   │                          │
//!   │              │                   └─ gate fails ─▶ NotApproved{draft}
//!   └──────────────┘                                              │
//!         ▲                         reopen()                      │
//!         └───────────────────────────────────────────────────────┘
//! ```
//!
//! Only an [`ApprovedRecord`] can be handed to
//! [`crate::workflow::Workflow::publish`], and the only way to get one is
//! [`DraftRecord::approve`], which runs the gate on the record as it is at
//! that moment. Editing requires going back to a draft, so every edit is
//! followed by a fresh gate check.

use crate::error::FormattingWarning;
use crate::pipeline::encode::SourceImage;
use crate::pipeline::format::{self, VerseParts};
use crate::pipeline::gate;
use crate::record::PublishRecord;
use std::fmt;
use tracing::debug;

/// Changes a reviewer may make. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt_text: Option<String>,
}

impl RecordEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.alt_text.is_none()
    }
}

/// An extracted record awaiting review.
#[derive(Debug, Clone)]
pub struct DraftRecord {
    record: PublishRecord,
    image: SourceImage,
    warnings: Vec<FormattingWarning>,
}

impl DraftRecord {
    pub fn new(record: PublishRecord, image: SourceImage, warnings: Vec<FormattingWarning>) -> Self {
        Self {
            record,
            image,
            warnings,
        }
    }

    pub fn record(&self) -> &PublishRecord {
        &self.record
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    /// Warnings raised while formatting the extracted fields.
    pub fn warnings(&self) -> &[FormattingWarning] {
        &self.warnings
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.record.set_title(title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.record.set_description(description);
    }

    pub fn set_alt_text(&mut self, alt_text: impl Into<String>) {
        self.record.set_alt_text(alt_text);
    }

    /// Apply every field present in `edit`.
    pub fn apply(&mut self, edit: RecordEdit) {
        if let Some(t) = edit.title {
            self.set_title(t);
        }
        if let Some(d) = edit.description {
            self.set_description(d);
        }
        if let Some(a) = edit.alt_text {
            self.set_alt_text(a);
        }
    }

    /// Verse and translation as currently written in the description.
    pub fn verse_parts(&self) -> VerseParts {
        format::split_description(self.record.description())
    }

    /// Would the gate pass right now?
    pub fn can_publish(&self) -> bool {
        gate::can_publish(&self.record)
    }

    /// Reasons the gate would reject the current record.
    pub fn rejection_reasons(&self) -> Vec<String> {
        gate::rejection_reasons(&self.record)
    }

    /// Run the gate and, if it passes, mark the record approved.
    pub fn approve(self) -> Result<ApprovedRecord, NotApproved> {
        let reasons = self.rejection_reasons();
        if reasons.is_empty() {
            debug!("Record approved: {}", self.record.title());
            Ok(ApprovedRecord { draft: self })
        } else {
            debug!("Approval refused: {}", reasons.join("; "));
            Err(NotApproved {
                draft: self,
                reasons,
            })
        }
    }
}

/// A record that passed the gate after its last edit.
#[derive(Debug, Clone)]
pub struct ApprovedRecord {
    draft: DraftRecord,
}

impl ApprovedRecord {
    pub fn record(&self) -> &PublishRecord {
        &self.draft.record
    }

    pub fn image(&self) -> &SourceImage {
        &self.draft.image
    }

    /// Go back to editing. The record must be approved again afterwards.
    pub fn reopen(self) -> DraftRecord {
        self.draft
    }
}

/// Approval was refused; the draft is handed back untouched.
#[derive(Debug)]
pub struct NotApproved {
    pub draft: DraftRecord,
    pub reasons: Vec<String>,
}

impl fmt::Display for NotApproved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record is not publishable: {}", self.reasons.join("; "))
    }
}

impl std::error::Error for NotApproved {}

impl From<NotApproved> for crate::error::VersePinError {
    fn from(e: NotApproved) -> Self {
        crate::error::VersePinError::GateRejected { reasons: e.reasons }
    }
}
