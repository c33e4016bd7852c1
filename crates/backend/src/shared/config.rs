use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::usecases::u502_ocr_enrichment::extraction::ExtractionRules;
use crate::usecases::u502_ocr_enrichment::update_policy::FieldPolicies;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// HTTP endpoint of the text recognition service
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_ocr_language")]
    pub language: String,
    /// Local folder with `<SKU>.jpg|jpeg|png` files
    #[serde(default)]
    pub image_dir: Option<String>,
    /// Pause between two recognized images
    #[serde(default = "default_ocr_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub rules: ExtractionRules,
    #[serde(default)]
    pub policies: FieldPolicies,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ocr_endpoint(),
            api_key: None,
            language: default_ocr_language(),
            image_dir: None,
            delay_ms: default_ocr_delay_ms(),
            rules: ExtractionRules::default(),
            policies: FieldPolicies::default(),
        }
    }
}

impl OcrConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_ocr_endpoint() -> String {
    "http://127.0.0.1:8884/ocr".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_ocr_delay_ms() -> u64 {
    800
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/storefront.db"

[server]
bind = "0.0.0.0:3000"

[ocr]
endpoint = "http://127.0.0.1:8884/ocr"
language = "eng"
delay_ms = 800
"#;

/// Environment variables that override the file configuration
pub const ENV_DB_PATH: &str = "STOREFRONT_DB_PATH";
pub const ENV_BIND: &str = "STOREFRONT_BIND";
pub const ENV_OCR_ENDPOINT: &str = "OCR_ENDPOINT";
pub const ENV_OCR_API_KEY: &str = "OCR_API_KEY";
pub const ENV_OCR_IMAGE_DIR: &str = "OCR_IMAGE_DIR";
pub const ENV_OCR_DELAY_MS: &str = "OCR_DELAY_MS";

impl Config {
    /// Apply overrides from a key lookup (the process environment in production).
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_DB_PATH) {
            self.database.path = v;
        }
        if let Some(v) = get(ENV_BIND) {
            self.server.bind = v;
        }
        if let Some(v) = get(ENV_OCR_ENDPOINT) {
            self.ocr.endpoint = v;
        }
        if let Some(v) = get(ENV_OCR_API_KEY) {
            self.ocr.api_key = Some(v);
        }
        if let Some(v) = get(ENV_OCR_IMAGE_DIR) {
            self.ocr.image_dir = Some(v);
        }
        if let Some(v) = get(ENV_OCR_DELAY_MS) {
            self.ocr.delay_ms = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("{} must be an integer: {}", ENV_OCR_DELAY_MS, e))?;
        }
        Ok(())
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment overrides are applied on top in both cases.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    // If absolute path, use as is
    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    // If relative path, resolve it relative to the executable directory
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}
