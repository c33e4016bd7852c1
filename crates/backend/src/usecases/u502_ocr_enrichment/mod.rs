pub mod executor;
pub mod extraction;
pub mod image_locator;
pub mod text_recognizer;
pub mod update_policy;

pub use executor::OcrEnrichmentExecutor;
pub use text_recognizer::{HttpTextRecognizer, OcrError, TextRecognizer};
