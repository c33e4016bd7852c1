pub mod report;

pub use report::{FieldChange, OcrRunReport, ProductChange};

use crate::usecases::common::UseCaseMetadata;

pub struct OcrEnrichment;

impl UseCaseMetadata for OcrEnrichment {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "ocr_enrichment"
    }

    fn display_name() -> &'static str {
        "OCR price and size extraction"
    }

    fn description() -> &'static str {
        "Reads product images, extracts price and size labels and fills catalog gaps"
    }
}
