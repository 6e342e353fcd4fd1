//! End-to-end tests against the live Gemini API.
//!
//! These use real verse images in `./test_cases/` and make live LLM calls.
//! They are gated behind the `E2E_ENABLED` environment variable so they do
//! not run in CI unless explicitly requested. Nothing is ever published.
//!
//! Run with:
//!   E2E_ENABLED=1 GEMINI_API_KEY=... cargo test --test e2e -- --nocapture

use std::path::PathBuf;
use versepin::{Confidence, PipelineConfig, Workflow};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no image at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP: test image not found: {}", p.display());
            return;
        }
        p
    }};
}

#[tokio::test]
async fn test_extract_verse_card() {
    let image = e2e_skip_unless_ready!(test_cases_dir().join("verse.jpg"));

    let config = PipelineConfig::from_env()
        .build()
        .expect("config should build");
    let workflow = Workflow::from_config(config).expect("GEMINI_API_KEY must be set");

    let draft = workflow.extract(&image).await.expect("extraction failed");
    let record = draft.record();
    println!("title:       {}", record.title());
    println!("confidence:  {}", record.confidence());
    println!("warnings:    {:?}", draft.warnings());
    println!("description:\n{}", record.description());

    assert!(record.title().ends_with("Trinity Catholic Media"));
    assert!(record.confidence().is_known(), "got {:?}", record.confidence());
    if *record.confidence() == Confidence::High {
        assert!(
            !draft.warnings().contains(&versepin::FormattingWarning::MissingVerseText),
            "a high-confidence reply should carry the verse"
        );
    }
}

#[tokio::test]
async fn test_extract_nonexistent_image() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
        return;
    }
    let config = PipelineConfig::from_env().build().unwrap();
    let workflow = Workflow::from_config(config).expect("GEMINI_API_KEY must be set");
    let result = workflow.extract(test_cases_dir().join("missing.jpg")).await;
    assert!(result.is_err());
}
