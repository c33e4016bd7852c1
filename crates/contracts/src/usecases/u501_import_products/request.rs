use super::mapping::ColumnMapping;
use serde::{Deserialize, Serialize};

/// Запрос предпросмотра: разбор файла, автосопоставление и проверка строк
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub file_name: String,
    pub csv_text: String,

    /// Сопоставление, исправленное оператором. Если нет, строится автоматически.
    #[serde(default)]
    pub mapping: Option<ColumnMapping>,
}

/// Запрос на запись строк в каталог
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub file_name: String,
    pub csv_text: String,

    /// Подтвержденное оператором сопоставление.
    /// Без него: канонический файл импортируется как есть (недостающие колонки
    /// получают дефолты), иначе автосопоставление должно покрыть обязательные поля.
    #[serde(default)]
    pub mapping: Option<ColumnMapping>,

    /// Оператор подтвердил "продолжить, несмотря на N ошибок проверки".
    /// Строки с ошибками все равно пропускаются.
    #[serde(default)]
    pub continue_despite_errors: bool,
}
