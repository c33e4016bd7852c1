use super::mapping::{CanonicalField, ColumnMapping};
use super::row::{CanonicalRow, ValidationError};
use crate::domain::a002_import_job::ImportJob;
use serde::{Deserialize, Serialize};

/// Результат предпросмотра файла
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub file_name: String,
    pub headers: Vec<String>,
    pub mapping: ColumnMapping,
    /// true, если заголовки файла уже канонические и ручное сопоставление не нужно
    pub auto_detected: bool,
    pub missing_required: Vec<CanonicalField>,
    pub total_rows: usize,
    pub rows: Vec<CanonicalRow>,
    /// Пустой список при полном успехе
    pub validation_errors: Vec<ValidationError>,
}

/// Исход обработки одной строки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Inserted,
    Updated,
    /// Отброшена проверкой, в хранилище не отправлялась
    Skipped,
    /// Ошибка хранилища при записи
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row: usize,
    pub sku: String,
    pub status: RowStatus,
}

/// Результат импорта: сводка задания и исход по каждой строке
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub job: ImportJob,
    pub inserted_count: usize,
    pub updated_count: usize,
    pub rows: Vec<RowOutcome>,
}
