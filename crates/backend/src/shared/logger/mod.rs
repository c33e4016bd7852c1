pub mod repository;

use repository::log_event_internal;

/// Источник записей, которые пишет API сервер
pub const SOURCE_SERVER: &str = "server";
/// Источник записей пакетного OCR-агента
pub const SOURCE_OCR_AGENT: &str = "ocr_agent";

/// Логирование события на сервере
///
/// # Примеры
/// ```ignore
/// logger::log("import", "stock.csv: 12 rows imported");
/// logger::log("publish", "5 drafts published");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal(SOURCE_SERVER, category, message);
}

/// Подписчик tracing: stdout + файл target/logs/<log_name>
pub fn init_tracing(log_name: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(log_name))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Отключаем логи SQL запросов, но оставляем логи приложения
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}
