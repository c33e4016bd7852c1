use std::collections::HashMap;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Откуда брать изображение товара
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Local(PathBuf),
    Remote(String),
}

impl ImageSource {
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Local(path) => path.display().to_string(),
            ImageSource::Remote(url) => url.clone(),
        }
    }
}

/// Индекс локальной папки изображений: имя файла в нижнем регистре → путь.
/// Папка читается один раз на запуск.
#[derive(Debug, Default)]
pub struct ImageLocator {
    files: HashMap<String, PathBuf>,
}

impl ImageLocator {
    /// Отсутствующая папка не ошибка: остается только image_url
    pub fn scan(dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut files = HashMap::new();
        let Some(dir) = dir else {
            return Ok(Self { files });
        };
        if !dir.is_dir() {
            tracing::warn!("Image directory not found: {}", dir.display());
            return Ok(Self { files });
        }

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_lowercase();
            files.entry(name).or_insert_with(|| entry.path());
        }
        tracing::info!("Indexed {} files in {}", files.len(), dir.display());
        Ok(Self { files })
    }

    pub fn local_file(&self, sku: &str) -> Option<&PathBuf> {
        let sku = sku.to_lowercase();
        IMAGE_EXTENSIONS
            .iter()
            .find_map(|ext| self.files.get(&format!("{}.{}", sku, ext)))
    }

    /// Сначала локальный файл `<SKU>.jpg|jpeg|png`, затем image_url товара
    pub fn locate(&self, sku: &str, image_url: Option<&str>) -> Option<ImageSource> {
        if let Some(path) = self.local_file(sku) {
            return Some(ImageSource::Local(path.clone()));
        }
        image_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| ImageSource::Remote(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("image_locator_{}_{}", name, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_local_file_case_insensitive() {
        let dir = temp_dir("case");
        std::fs::write(dir.join("ANK-001.JPG"), b"x").unwrap();
        std::fs::write(dir.join("notes.txt"), b"x").unwrap();

        let locator = ImageLocator::scan(Some(&dir)).unwrap();
        assert_eq!(
            locator.locate("ank-001", Some("https://cdn.example/a.jpg")),
            Some(ImageSource::Local(dir.join("ANK-001.JPG")))
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_remote_fallback_and_skip() {
        let locator = ImageLocator::scan(None).unwrap();
        assert_eq!(
            locator.locate("KRT-9", Some("https://cdn.example/krt-9.png")),
            Some(ImageSource::Remote("https://cdn.example/krt-9.png".into()))
        );
        assert_eq!(locator.locate("KRT-9", Some("  ")), None);
        assert_eq!(locator.locate("KRT-9", None), None);
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let missing = std::env::temp_dir().join("image_locator_missing_dir_for_test");
        let locator = ImageLocator::scan(Some(&missing)).unwrap();
        assert!(locator.local_file("ANY").is_none());
    }
}
