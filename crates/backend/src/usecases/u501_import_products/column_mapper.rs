//! Сопоставление заголовков файла с полями каталога.

use contracts::usecases::u501_import_products::{CanonicalField, ColumnMapping, FIELD_SPECS};

/// Автосопоставление по таблице полей.
///
/// Для каждого поля в порядке объявления:
/// 1. точное совпадение заголовка (trim + lowercase) с ключом поля;
/// 2. иначе алиасы по порядку: первый алиас, входящий подстрокой хотя бы в один
///    заголовок, привязывает первый такой заголовок в порядке колонок.
///
/// Один заголовок может оказаться привязан к нескольким полям; это исправляет оператор.
pub fn auto_map(headers: &[String]) -> ColumnMapping {
    let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut mapping = ColumnMapping::default();

    for spec in FIELD_SPECS.iter() {
        if let Some(idx) = lower.iter().position(|h| h == spec.key) {
            mapping.bind(spec.field, headers[idx].clone());
            continue;
        }

        let alias_hit = spec.aliases.iter().find_map(|alias| {
            lower
                .iter()
                .position(|h| h.contains(alias))
                .map(|idx| headers[idx].clone())
        });
        if let Some(header) = alias_hit {
            mapping.bind(spec.field, header);
        }
    }

    mapping
}

/// Файл уже в каноническом формате, если среди заголовков буквально есть `sku` и `name`.
/// Тогда каждое поле привязывается к заголовку, равному его ключу, и ручное
/// сопоставление не требуется.
pub fn detect_exact_headers(headers: &[String]) -> Option<ColumnMapping> {
    let has = |key: &str| headers.iter().any(|h| h == key);
    if !(has(CanonicalField::Sku.key()) && has(CanonicalField::Name.key())) {
        return None;
    }

    let mut mapping = ColumnMapping::default();
    for field in CanonicalField::all() {
        if has(field.key()) {
            mapping.bind(field, field.key());
        }
    }
    Some(mapping)
}

/// Сопоставление для пакета: сначала подтвержденное оператором, затем
/// автоопределение канонических заголовков, затем автосопоставление.
/// Возвращает (mapping, auto_detected).
pub fn resolve(headers: &[String], confirmed: Option<&ColumnMapping>) -> (ColumnMapping, bool) {
    if let Some(mapping) = confirmed {
        return (mapping.clone(), false);
    }
    match detect_exact_headers(headers) {
        Some(mapping) => (mapping, true),
        None => (auto_map(headers), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_beats_alias() {
        let h = headers(&["Product Code", " SKU ", "Title", "MRP"]);
        let m = auto_map(&h);
        assert_eq!(m.get(CanonicalField::Sku), Some(" SKU "));
        assert_eq!(m.get(CanonicalField::Name), Some("Title"));
        assert_eq!(m.get(CanonicalField::SellingPrice), Some("MRP"));
        assert_eq!(m.missing_required(), vec![CanonicalField::Category]);
    }

    #[test]
    fn test_alias_order_then_column_order() {
        // "price" идет раньше "mrp" в списке алиасов, поэтому побеждает колонка с price,
        // хотя MRP стоит левее
        let h = headers(&["MRP", "Sale Price", "Price Old"]);
        let m = auto_map(&h);
        assert_eq!(m.get(CanonicalField::SellingPrice), Some("Sale Price"));
    }

    #[test]
    fn test_auto_map_is_idempotent() {
        let h = headers(&["Item Code", "Description", "Dept", "Amount", "Qty", "Variant"]);
        let first = auto_map(&h);
        let second = auto_map(&h);
        assert_eq!(first, second);
        assert_eq!(first.get(CanonicalField::Sku), Some("Item Code"));
        assert_eq!(first.get(CanonicalField::StockQty), Some("Qty"));
        assert_eq!(first.get(CanonicalField::Sizes), Some("Variant"));
    }

    #[test]
    fn test_mixed_headers_scenario() {
        let h = headers(&["Item Code", "Title", "Dept", "MRP"]);
        let m = auto_map(&h);
        assert_eq!(m.get(CanonicalField::Sku), Some("Item Code"));
        assert_eq!(m.get(CanonicalField::Name), Some("Title"));
        assert_eq!(m.get(CanonicalField::SellingPrice), Some("MRP"));
        // "Dept" не содержит ни одного алиаса категории
        assert_eq!(m.get(CanonicalField::Category), None);
        assert!(!m.is_complete());
    }

    #[test]
    fn test_detect_exact_headers() {
        let canonical = headers(&["sku", "name", "category", "selling_price", "sizes"]);
        let m = detect_exact_headers(&canonical).unwrap();
        assert_eq!(m.get(CanonicalField::SellingPrice), Some("selling_price"));
        assert_eq!(m.get(CanonicalField::StockQty), None);

        assert!(detect_exact_headers(&headers(&["SKU", "Name"])).is_none());
    }

    #[test]
    fn test_resolve_prefers_confirmed_mapping() {
        let h = headers(&["sku", "name"]);
        let mut confirmed = ColumnMapping::default();
        confirmed.bind(CanonicalField::Sku, "name");
        let (m, auto) = resolve(&h, Some(&confirmed));
        assert!(!auto);
        assert_eq!(m, confirmed);

        let (_, auto) = resolve(&h, None);
        assert!(auto);
    }
}
