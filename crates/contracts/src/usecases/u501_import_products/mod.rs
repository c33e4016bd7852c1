pub mod mapping;
pub mod request;
pub mod response;
pub mod row;

pub use mapping::{CanonicalField, ColumnMapping, FieldSpec, FIELD_SPECS};
pub use request::{ImportRequest, PreviewRequest};
pub use response::{ImportResponse, PreviewResponse, RowOutcome, RowStatus};
pub use row::{row_number, CanonicalRow, ValidationError, ROW_NUMBER_OFFSET};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportProducts;

impl UseCaseMetadata for ImportProducts {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_products"
    }

    fn display_name() -> &'static str {
        "Bulk product import (CSV)"
    }

    fn description() -> &'static str {
        "Column mapping, validation and SKU upsert of draft products from a CSV file"
    }
}
