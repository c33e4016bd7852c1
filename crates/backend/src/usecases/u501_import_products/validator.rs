use contracts::usecases::u501_import_products::{row_number, CanonicalRow, ValidationError};
use std::collections::HashSet;

use super::transformer::parse_leading_float;

pub const ERR_SKU_MISSING: &str = "SKU is missing";
pub const ERR_DUPLICATE_SKU: &str = "Duplicate SKU in file";
pub const ERR_NAME_MISSING: &str = "Name is missing";
pub const ERR_INVALID_PRICE: &str = "Invalid Price";

const SKU_PLACEHOLDER: &str = "N/A";

/// Цена годится, если в начале значения есть конечное число больше нуля
pub fn is_valid_price(value: Option<&str>) -> bool {
    value
        .and_then(parse_leading_float)
        .is_some_and(|price| price > 0.0)
}

/// Проверка всех строк пакета. Правила независимы, одна строка может нарушить несколько.
/// Дубликатом считается второе и последующие вхождения SKU (точное совпадение).
pub fn validate(rows: &[CanonicalRow]) -> Vec<ValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let mut messages = Vec::new();

        match row.sku.as_deref() {
            None => messages.push(ERR_SKU_MISSING.to_string()),
            Some(sku) => {
                if !seen.insert(sku) {
                    messages.push(ERR_DUPLICATE_SKU.to_string());
                }
            }
        }
        if row.name.is_none() {
            messages.push(ERR_NAME_MISSING.to_string());
        }
        if !is_valid_price(row.selling_price.as_deref()) {
            messages.push(ERR_INVALID_PRICE.to_string());
        }

        if !messages.is_empty() {
            errors.push(ValidationError {
                row: row_number(index),
                sku: row.sku.clone().unwrap_or_else(|| SKU_PLACEHOLDER.to_string()),
                errors: messages,
            });
        }
    }

    errors
}
