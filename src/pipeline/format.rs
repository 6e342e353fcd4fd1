//! Record formatting: [`ExtractedFields`] → branded [`PublishRecord`].
//!
//! Never fails. Missing pieces are replaced with the brand defaults and
//! reported as [`FormattingWarning`]s so the caller can decide whether to
//! edit before publishing.

use crate::error::FormattingWarning;
use crate::record::{Confidence, ExtractedFields, PublishRecord};
use serde::Serialize;
use tracing::warn;

/// Brand name appended to every title and used as the fallback title.
pub const BRAND: &str = "Trinity Catholic Media";

/// Title used when the reply carried no verse reference.
pub const DEFAULT_TITLE: &str = BRAND;

/// Appended to a composed description.
pub const PROMO_SUFFIX: &str = "\n\nStay inspired daily! Follow our WhatsApp channel for the latest Bible verses: \
https://whatsapp.com/channel/0029VbAhLis0rGiVQd0HSw03";

/// Description used when verse text or translation is missing.
pub const DEFAULT_DESCRIPTION: &str = "Stay inspired daily! Follow our WhatsApp channel for the latest Bible verses: \
https://whatsapp.com/channel/0029VbAhLis0rGiVQd0HSw03";

/// A formatted record plus whatever had to be defaulted along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub record: PublishRecord,
    pub warnings: Vec<FormattingWarning>,
}

/// Build the publish record from extracted fields.
pub fn format_record(fields: &ExtractedFields) -> Formatted {
    let mut warnings = Vec::new();

    let title = format_title(fields.title.as_deref());

    let description = match compose_description(
        fields.malayalam_verse.as_deref(),
        fields.english_translation.as_deref(),
    ) {
        Some(d) => d,
        None => {
            warnings.push(FormattingWarning::MissingVerseText);
            DEFAULT_DESCRIPTION.to_string()
        }
    };

    let alt_text = fields
        .alt_text_source
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let confidence = match fields.confidence_level.as_deref() {
        None => {
            warnings.push(FormattingWarning::MissingConfidence);
            Confidence::Low
        }
        Some(raw) => {
            let c = Confidence::from_raw(raw);
            if let Confidence::Unrecognized(ref value) = c {
                warnings.push(FormattingWarning::UnrecognizedConfidence {
                    value: value.clone(),
                });
            }
            c
        }
    };

    for w in &warnings {
        warn!("{}", w);
    }

    Formatted {
        record: PublishRecord::new(title, description, alt_text, confidence),
        warnings,
    }
}

/// `"<reference> | Trinity Catholic Media"`, or the brand alone.
pub fn format_title(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => format!("{t} | {BRAND}"),
        _ => DEFAULT_TITLE.to_string(),
    }
}

/// `"<malayalam>\n\nEnglish: <english>"` plus the promotional suffix, or
/// `None` when either part is missing or blank.
pub fn compose_description(malayalam: Option<&str>, english: Option<&str>) -> Option<String> {
    let malayalam = malayalam.map(str::trim).filter(|s| !s.is_empty())?;
    let english = english.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("{malayalam}\n\nEnglish: {english}{PROMO_SUFFIX}"))
}

/// The verse and translation recovered from a composed description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseParts {
    pub malayalam_text: String,
    pub english_text: String,
}

/// Split a description produced by [`compose_description`] back into its
/// parts. Descriptions in any other shape give the placeholders
/// "Not extracted" / "Not available".
pub fn split_description(description: &str) -> VerseParts {
    let mut parts = VerseParts {
        malayalam_text: "Not extracted".to_string(),
        english_text: "Not available".to_string(),
    };

    if let Some((malayalam, rest)) = description.split_once("\n\nEnglish: ") {
        parts.malayalam_text = malayalam.to_string();
        parts.english_text = rest.split("\n\n").next().unwrap_or_default().to_string();
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(
        title: Option<&str>,
        ml: Option<&str>,
        en: Option<&str>,
        alt: Option<&str>,
        conf: Option<&str>,
    ) -> ExtractedFields {
        ExtractedFields {
            title: title.map(String::from),
            malayalam_verse: ml.map(String::from),
            english_translation: en.map(String::from),
            alt_text_source: alt.map(String::from),
            confidence_level: conf.map(String::from),
        }
    }

    #[test]
    fn title_is_branded() {
        assert_eq!(format_title(Some("  John 3:16 ")), "John 3:16 | Trinity Catholic Media");
        assert_eq!(format_title(Some("   ")), DEFAULT_TITLE);
        assert_eq!(format_title(None), DEFAULT_TITLE);
    }

    #[test]
    fn description_composition_is_verbatim() {
        let d = compose_description(Some("ആഹ്ലാദിക്കുക"), Some("Rejoice")).unwrap();
        assert_eq!(d, format!("ആഹ്ലാദിക്കുക\n\nEnglish: Rejoice{PROMO_SUFFIX}"));
    }

    #[test]
    fn description_parts_are_trimmed() {
        let d = compose_description(Some(" ദൈവം \n"), Some("  God ")).unwrap();
        assert!(d.starts_with("ദൈവം\n\nEnglish: God\n\nStay inspired"));
    }

    #[test]
    fn missing_verse_uses_default_and_warns() {
        let f = format_record(&fields(Some("Ps 1"), Some(""), Some("Blessed"), Some("alt"), Some("high")));
        assert_eq!(f.record.description(), DEFAULT_DESCRIPTION);
        assert_eq!(f.warnings, vec![FormattingWarning::MissingVerseText]);
        assert_ne!(DEFAULT_DESCRIPTION, DEFAULT_TITLE);
    }

    #[test]
    fn missing_translation_uses_default() {
        let f = format_record(&fields(None, Some("ദൈവം"), None, None, Some("low")));
        assert_eq!(f.record.description(), DEFAULT_DESCRIPTION);
        assert_eq!(f.record.title(), DEFAULT_TITLE);
        assert_eq!(f.record.alt_text(), "");
    }

    #[test]
    fn confidence_normalisation() {
        for (input, expected) in [
            (Some("HIGH"), Confidence::High),
            (Some("High"), Confidence::High),
            (Some("mEdIuM"), Confidence::Medium),
            (Some("LOW"), Confidence::Low),
            (None, Confidence::Low),
        ] {
            let f = format_record(&fields(None, None, None, None, input));
            assert_eq!(f.record.confidence(), &expected, "input {input:?}");
            assert_eq!(f.record.confidence().as_str(), expected.as_str().to_lowercase());
        }
    }

    #[test]
    fn missing_confidence_is_reported() {
        let f = format_record(&fields(Some("a"), Some("b"), Some("c"), Some("d"), None));
        assert_eq!(f.warnings, vec![FormattingWarning::MissingConfidence]);
    }

    #[test]
    fn unrecognised_confidence_passes_through_lowercased() {
        let f = format_record(&fields(Some("a"), Some("b"), Some("c"), Some("d"), Some("Certain")));
        assert_eq!(f.record.confidence(), &Confidence::Unrecognized("certain".into()));
        assert_eq!(
            f.warnings,
            vec![FormattingWarning::UnrecognizedConfidence { value: "certain".into() }]
        );
    }

    #[test]
    fn alt_text_trimmed() {
        let f = format_record(&fields(None, None, None, Some("  verse card  "), Some("high")));
        assert_eq!(f.record.alt_text(), "verse card");
    }

    #[test]
    fn split_recovers_parts() {
        let d = compose_description(Some("ദൈവം"), Some("God so loved")).unwrap();
        let parts = split_description(&d);
        assert_eq!(parts.malayalam_text, "ദൈവം");
        assert_eq!(parts.english_text, "God so loved");
    }

    #[test]
    fn split_default_description_gives_placeholders() {
        let parts = split_description(DEFAULT_DESCRIPTION);
        assert_eq!(parts.malayalam_text, "Not extracted");
        assert_eq!(parts.english_text, "Not available");
    }
}
