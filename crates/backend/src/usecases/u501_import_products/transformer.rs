use contracts::domain::a001_product::Variant;
use contracts::usecases::u501_import_products::{CanonicalField, CanonicalRow, ColumnMapping};
use once_cell::sync::Lazy;
use regex::Regex;

use super::csv_parser::RawRow;

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("float regex is valid")
});
static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("int regex is valid"));

/// Число в начале строки, остаток игнорируется ("2500 MUR" → 2500, "Rs 2500" → None)
pub fn parse_leading_float(value: &str) -> Option<f64> {
    let m = LEADING_FLOAT.find(value.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Целое в начале строки ("10.7" → 10)
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let m = LEADING_INT.find(value.trim_start())?;
    m.as_str().parse::<i64>().ok()
}

/// Результат разбора строки размеров
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedVariants {
    pub sizes: Vec<String>,
    pub variants: Vec<Variant>,
    pub total: i64,
}

/// Разбор "S:5; M:3; L:2" или "S, M, L".
/// Токены `метка:число` дают остаток и идут в сумму, прочие токены получают остаток 0.
/// Порядок и повторы сохраняются. Сумма насыщается на i64::MAX.
pub fn parse_variants(value: &str) -> ParsedVariants {
    let mut parsed = ParsedVariants::default();

    for token in value.split([';', ',']).map(str::trim).filter(|t| !t.is_empty()) {
        let (label, stock) = match token.split_once(':') {
            Some((label, qty))
                if !label.trim().is_empty()
                    && !qty.trim().is_empty()
                    && qty.trim().chars().all(|c| c.is_ascii_digit()) =>
            {
                match qty.trim().parse::<i64>() {
                    Ok(stock) => (label.trim().to_string(), stock),
                    Err(_) => (token.to_string(), 0),
                }
            }
            _ => (token.to_string(), 0),
        };
        parsed.total = parsed.total.saturating_add(stock);
        parsed.sizes.push(label.clone());
        parsed.variants.push(Variant::new(label, stock));
    }

    parsed
}

fn mapped_value(raw: &RawRow, mapping: &ColumnMapping, field: CanonicalField) -> Option<String> {
    let header = mapping.get(field)?;
    raw.get(header)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Применить сопоставление к сырой строке. Дефолтов здесь нет:
/// несопоставленное или пустое поле остается `None`.
pub fn transform_row(raw: &RawRow, mapping: &ColumnMapping) -> CanonicalRow {
    let value = |field| mapped_value(raw, mapping, field);

    let parsed = value(CanonicalField::Sizes)
        .map(|s| parse_variants(&s))
        .unwrap_or_default();

    let stock_qty = if parsed.total > 0 {
        Some(parsed.total.to_string())
    } else {
        value(CanonicalField::StockQty)
    };

    CanonicalRow {
        sku: value(CanonicalField::Sku),
        name: value(CanonicalField::Name),
        category: value(CanonicalField::Category),
        selling_price: value(CanonicalField::SellingPrice),
        stock_qty,
        sizes: parsed.sizes,
        variants: parsed.variants,
        color: value(CanonicalField::Color),
        fabric: value(CanonicalField::Fabric),
    }
}

pub fn transform_rows(rows: &[RawRow], mapping: &ColumnMapping) -> Vec<CanonicalRow> {
    rows.iter().map(|raw| transform_row(raw, mapping)).collect()
}
