//! Data carried between pipeline stages.
//!
//! ```text
//! RawExtraction ──parse──▶ ExtractedFields ──format──▶ PublishRecord ──▶ PublishPayload
//!  (model text)             (5 optional keys)          (4 fields)        (wire JSON)
//! ```
//!
//! Nothing here outlives one workflow run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The AI service's literal text reply.
///
/// May still contain code fences and trailing commas; see
/// [`crate::pipeline::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtraction(String);

impl RawExtraction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RawExtraction {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RawExtraction {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The five keys decoded from a reply. A key missing from the reply (or
/// `null`) is `None`; it is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub malayalam_verse: Option<String>,
    pub english_translation: Option<String>,
    pub alt_text_source: Option<String>,
    pub confidence_level: Option<String>,
}

/// Extraction confidence reported by the model.
///
/// Anything outside the three known levels is kept (lower-cased) as
/// `Unrecognized` so the gate can reject it and the caller can see what the
/// model actually said.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Confidence {
    High,
    Medium,
    #[default]
    Low,
    Unrecognized(String),
}

impl Confidence {
    /// Case-insensitive parse. Never fails.
    pub fn from_raw(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::Unrecognized(lowered),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::Unrecognized(s) => s,
        }
    }

    /// True for one of the three known levels.
    pub fn is_known(&self) -> bool {
        !matches!(self, Confidence::Unrecognized(_))
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Confidence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Confidence::from_raw(&raw))
    }
}

/// The publish-ready record.
///
/// Title, description and alt text can be overwritten during review; the
/// confidence only ever comes from the extraction step, so it has no setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRecord {
    title: String,
    description: String,
    alt_text: String,
    confidence: Confidence,
}

impl PublishRecord {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        alt_text: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            alt_text: alt_text.into(),
            confidence,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn alt_text(&self) -> &str {
        &self.alt_text
    }

    pub fn confidence(&self) -> &Confidence {
        &self.confidence
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_alt_text(&mut self, alt_text: impl Into<String>) {
        self.alt_text = alt_text.into();
    }

    /// Copy with the three text fields trimmed and confidence lower-cased.
    /// This is the form that goes on the wire.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            alt_text: self.alt_text.trim().to_string(),
            confidence: Confidence::from_raw(self.confidence.as_str()),
        }
    }
}

/// Wire body for `POST /v5/pins`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishPayload {
    pub board_id: String,
    pub media_source: MediaSource,
    pub title: String,
    pub description: String,
    pub link: String,
    pub alt_text: String,
}

/// Inline image upload descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaSource {
    pub source_type: String,
    pub content_type: String,
    /// Base64 image bytes.
    pub data: String,
}

/// A successful publish. The body shape belongs to the remote API and is
/// kept as opaque JSON (or a JSON string when the body was not JSON).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishConfirmation {
    pub status: u16,
    pub body: serde_json::Value,
}

impl PublishConfirmation {
    /// The created pin's id, when the response carries one.
    pub fn pin_id(&self) -> Option<&str> {
        self.body.get("id").and_then(|v| v.as_str())
    }
}
