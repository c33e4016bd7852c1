/// Метаданные UseCase для идентификации и документирования
pub trait UseCaseMetadata {
    /// Индекс UseCase (например, "u501")
    fn usecase_index() -> &'static str;

    /// Техническое имя (например, "import_products")
    fn usecase_name() -> &'static str;

    /// Отображаемое имя для UI (например, "Bulk product import (CSV)")
    fn display_name() -> &'static str;

    /// Описание UseCase
    fn description() -> &'static str {
        ""
    }

    /// Полное имя вида "u501_import_products"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    impl UseCaseMetadata for Sample {
        fn usecase_index() -> &'static str {
            "u999"
        }

        fn usecase_name() -> &'static str {
            "sample"
        }

        fn display_name() -> &'static str {
            "Sample"
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(Sample::full_name(), "u999_sample");
        assert_eq!(Sample::description(), "");
    }
}
