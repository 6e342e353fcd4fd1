//! Error types for the versepin library.
//!
//! Two distinct types reflect two distinct failure modes:
//!
//! * [`VersePinError`]: **Fatal for the current run**: the workflow step
//!   cannot proceed (unreadable AI reply, missing credential, rejected
//!   publish). Returned as `Err(VersePinError)`; nothing is retried.
//!
//! * [`FormattingWarning`]: **Non-fatal**: the formatter substituted a
//!   default value (e.g. the branded description when verse text is missing)
//!   and carried on. Collected next to the record in
//!   [`crate::review::DraftRecord`] so callers can display them.
//!
//! No error here is fatal to the hosting process; every failure is scoped to
//! a single workflow run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the versepin library.
#[derive(Debug, Error)]
pub enum VersePinError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The image could not be read, or is not a JPEG/PNG.
    #[error("Failed to read image '{path}': {detail}")]
    ImageRead { path: PathBuf, detail: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The AI service call failed, timed out, or returned nothing.
    #[error("Text extraction failed: {message}")]
    Extraction { message: String },

    /// The AI reply could not be decoded as JSON even after cleanup.
    ///
    /// `raw` holds the reply exactly as received, for diagnostics.
    #[error("Error parsing JSON: {source}\nRaw output was:\n{raw}")]
    Parse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    // ── Publish errors ────────────────────────────────────────────────────
    /// One or more required pin fields are blank.
    #[error("Missing required fields for Pinterest upload: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    /// The record failed the validation gate and was not published.
    #[error("Record is not publishable: {}", .reasons.join("; "))]
    GateRejected { reasons: Vec<String> },

    /// The publishing API answered with a non-2xx status.
    #[error("Failed to create pin: {status} {body}")]
    PublishRejected { status: u16, body: String },

    /// The publish request never produced a response (timeout, DNS, TLS…).
    #[error("Pinterest upload error: {detail}")]
    Transport { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// A required credential is missing or the configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for VersePinError {
    fn from(e: reqwest::Error) -> Self {
        let detail = if e.is_timeout() {
            format!("request timed out: {e}")
        } else if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            e.to_string()
        };
        VersePinError::Transport { detail }
    }
}

/// A non-fatal condition raised while formatting a record.
///
/// The pipeline substitutes a default value and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormattingWarning {
    /// Malayalam verse or English translation was absent or blank;
    /// the default description was used instead.
    #[error("Bible verse information is missing in the response.")]
    MissingVerseText,

    /// The reply carried no confidence level; it defaulted to `low`, which
    /// blocks publishing.
    #[error("Confidence level is missing; defaulted to 'low' (publishing will be blocked).")]
    MissingConfidence,

    /// The reply carried a confidence value outside high/medium/low.
    #[error("Unrecognised confidence level '{value}' (publishing will be blocked).")]
    UnrecognizedConfidence { value: String },
}
