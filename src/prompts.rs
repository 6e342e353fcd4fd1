//! Extraction prompt sent to the vision model together with the image.
//!
//! Keeping the prompt here means the reply contract (the five JSON keys the
//! parser looks for) and the instruction that asks for them live side by
//! side, and tests can check one against the other without calling a model.
//!
//! Callers can override the default via
//! [`crate::config::PipelineConfig::extraction_prompt`].

/// JSON keys the model is asked to return, in prompt order.
pub const REPLY_KEYS: [&str; 5] = [
    "title",
    "extracted_bible_verse_malayalam",
    "bible_verse_english_translation",
    "alternative_text_for_main_content",
    "confidence_level",
];

/// Default instruction for extracting a Bible verse card.
pub const DEFAULT_EXTRACTION_PROMPT: &str = r#"Analyze this image and extract the following information as a JSON object:

{
    "title": "The bible verse reference extracted from the image",
    "extracted_bible_verse_malayalam": "The Malayalam Bible verse text exactly as shown in the image",
    "bible_verse_english_translation": "English translation of the Malayalam verse",
    "alternative_text_for_main_content": "Alternative text describing what's in the image for accessibility",
    "confidence_level": "high/medium/low - your confidence in the extraction accuracy"
}

Important guidelines:
- Extract the Malayalam text exactly as it appears
- Provide accurate English translation
- Be honest about confidence level
- Make alt text descriptive for accessibility

Return only the JSON object, no additional text."#;
