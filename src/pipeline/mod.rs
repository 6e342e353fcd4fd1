//! Pipeline stages for image-to-pin publication.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the two network-facing steps can be replaced by fakes.
//!
//! ## Data Flow
//!
//! ```text
//! encode ──▶ extract ──▶ parse ──▶ format ──▶ gate ──▶ publish
//! (file)     (vision AI)  (JSON)   (brand)    (check)  (REST)
//! ```
//!
//! 1. [`encode`]: read the image, sniff JPEG/PNG, base64 for requests
//! 2. [`extract`]: one vision-LLM call behind the [`extract::Extractor`] trait
//! 3. [`parse`]: strip fences, repair trailing commas, pick the five keys
//! 4. [`format`]: brand the title, compose the description, normalise confidence
//! 5. [`gate`]: pure publish-eligibility checks
//! 6. [`publish`]: one pin-creation request behind the [`publish::Publisher`] trait

pub mod encode;
pub mod extract;
pub mod format;
pub mod gate;
pub mod parse;
pub mod publish;
