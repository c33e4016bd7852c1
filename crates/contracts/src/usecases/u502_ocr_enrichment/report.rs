use serde::{Deserialize, Serialize};

/// Что именно изменилось у товара после распознавания
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldChange {
    Price { from: f64, to: f64 },
    Sizes { to: Vec<String> },
    Color { to: String },
    Fabric { to: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductChange {
    pub sku: String,
    pub changes: Vec<FieldChange>,
}

/// Итог одного запуска OCR-агента
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrRunReport {
    /// Всего товаров с SKU
    pub scanned: usize,
    /// Нет ни локального файла, ни image_url
    pub skipped_no_image: usize,
    /// Изображение распознано
    pub processed: usize,
    pub updated: usize,
    /// Ошибки чтения, распознавания или записи
    pub failed: usize,
    pub changes: Vec<ProductChange>,
}
