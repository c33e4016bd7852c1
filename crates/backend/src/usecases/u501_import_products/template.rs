/// Имя файла образца для скачивания
pub const TEMPLATE_FILE_NAME: &str = "storefront_import_template.csv";

/// Минимальный образец файла импорта. `Sizes` принимает `метка:количество` через `;`.
pub const TEMPLATE_CSV: &str = "SKU,Name,Category,Price,Stock,Color,Fabric,Sizes
ANK-001,Anarkali Red,Suits,2500,10,Red,Cotton,S:5;M:3;L:2
ANK-002,Blue Kurti,Kurtis,1200,5,Blue,Silk,Free Size
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_products::{column_mapper, csv_parser, transformer, validator};

    #[test]
    fn test_template_imports_cleanly() {
        let parsed = csv_parser::parse_csv(TEMPLATE_CSV).unwrap();
        let mapping = column_mapper::auto_map(&parsed.headers);
        assert!(mapping.is_complete());

        let rows = transformer::transform_rows(&parsed.rows, &mapping);
        assert!(validator::validate(&rows).is_empty());
        assert_eq!(rows[0].stock_qty.as_deref(), Some("10"));
        assert_eq!(rows[1].sizes, vec!["Free Size"]);
    }
}
