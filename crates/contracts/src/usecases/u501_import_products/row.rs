use crate::domain::a001_product::Variant;
use serde::{Deserialize, Serialize};

/// Строка после применения сопоставления колонок.
/// Значения остаются сырыми строками: дефолты и приведение типов делает импортер.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub selling_price: Option<String>,
    /// Сумма остатков по вариантам, если она > 0, иначе значение колонки остатка
    pub stock_qty: Option<String>,
    /// Метки размеров в порядке файла, дубликаты сохраняются
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    pub color: Option<String>,
    pub fabric: Option<String>,
}

/// Ошибка проверки строки файла
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Номер строки как в таблице: индекс данных + 2 (учтена строка заголовка)
    pub row: usize,
    /// SKU строки или "N/A"
    pub sku: String,
    pub errors: Vec<String>,
}

/// Смещение номера строки: нумерация с 1 плюс строка заголовка
pub const ROW_NUMBER_OFFSET: usize = 2;

pub fn row_number(index: usize) -> usize {
    index + ROW_NUMBER_OFFSET
}
