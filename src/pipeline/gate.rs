//! Validation gate: may this record be published?
//!
//! Pure checks over a [`PublishRecord`]. A record passes when title,
//! description and alt text are non-blank and the confidence is `high` or
//! `medium`. The workflow re-runs the gate after every edit; see
//! [`crate::review`].

use crate::record::{Confidence, PublishRecord};
use serde::Serialize;

/// Per-field result of the non-blank check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    pub title: bool,
    pub description: bool,
    pub alt_text: bool,
}

impl FieldValidation {
    pub fn all_valid(&self) -> bool {
        self.title && self.description && self.alt_text
    }
}

/// Check each required text field for non-blank content.
pub fn field_validation(record: &PublishRecord) -> FieldValidation {
    FieldValidation {
        title: !record.title().trim().is_empty(),
        description: !record.description().trim().is_empty(),
        alt_text: !record.alt_text().trim().is_empty(),
    }
}

pub fn all_fields_valid(record: &PublishRecord) -> bool {
    field_validation(record).all_valid()
}

/// `high` and `medium` pass; `low` and anything unrecognised do not.
pub fn confidence_acceptable(record: &PublishRecord) -> bool {
    match record.confidence() {
        Confidence::High | Confidence::Medium => true,
        Confidence::Low => false,
        // Only reachable when built directly rather than via `from_raw`.
        Confidence::Unrecognized(s) => matches!(s.to_lowercase().as_str(), "high" | "medium"),
    }
}

/// The single publish gate.
pub fn can_publish(record: &PublishRecord) -> bool {
    all_fields_valid(record) && confidence_acceptable(record)
}

/// A blank required field, with the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every blank required field, in display order.
pub fn field_errors(record: &PublishRecord) -> Vec<FieldError> {
    let v = field_validation(record);
    [
        (v.title, "title", "Pin title is required"),
        (v.description, "description", "Pin description is required"),
        (v.alt_text, "alt_text", "Alt text is required for accessibility"),
    ]
    .into_iter()
    .filter(|(ok, _, _)| !ok)
    .map(|(_, field, message)| FieldError { field, message })
    .collect()
}

/// Human-readable reasons the record fails the gate; empty when it passes.
pub fn rejection_reasons(record: &PublishRecord) -> Vec<String> {
    let mut reasons: Vec<String> = field_errors(record)
        .into_iter()
        .map(|e| e.message.to_string())
        .collect();
    if !confidence_acceptable(record) {
        reasons.push(format!(
            "Confidence level '{}' is too low to publish (needs high or medium)",
            record.confidence()
        ));
    }
    reasons
}
