use serde::{Deserialize, Serialize};

/// Запись журнала событий сервера
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    /// "server" для API, "ocr_agent" для пакетного OCR
    pub source: String,
    pub category: String,
    pub message: String,
}
