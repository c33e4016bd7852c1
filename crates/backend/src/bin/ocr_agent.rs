//! Пакетное OCR-обогащение каталога.
//!
//! Проходит по всем товарам, распознает текст на изображении (локальный файл
//! `<SKU>.jpg|jpeg|png` или image_url) и дописывает цену, размеры, цвет и ткань
//! по политикам из `[ocr.policies]`. Ошибки по отдельным товарам не прерывают запуск.

use std::sync::Arc;

use backend::domain::a001_product::SeaOrmProductStore;
use backend::shared;
use backend::usecases::u502_ocr_enrichment::{HttpTextRecognizer, OcrEnrichmentExecutor};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_ocr_enrichment::OcrEnrichment;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::logger::init_tracing("ocr_agent.log")?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    let db_path_str = db_path.to_string_lossy().to_string();
    shared::data::db::initialize_database(Some(db_path_str.as_str()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    tracing::info!("Starting {}", OcrEnrichment::display_name());
    tracing::info!(
        "OCR agent: endpoint={}, image_dir={}, delay={}ms",
        config.ocr.endpoint,
        config.ocr.image_dir.as_deref().unwrap_or("-"),
        config.ocr.delay_ms
    );

    let recognizer = HttpTextRecognizer::new(&config.ocr)?;
    let executor = OcrEnrichmentExecutor::new(
        Arc::new(SeaOrmProductStore),
        Arc::new(recognizer),
        &config.ocr,
    )?;

    let report = executor.run().await?;

    let summary = format!(
        "scanned {}, processed {}, updated {}, failed {}, without image {}",
        report.scanned, report.processed, report.updated, report.failed, report.skipped_no_image
    );
    // процесс сейчас завершится, поэтому пишем в event log синхронно
    let logged = shared::logger::repository::log_event(
        shared::logger::SOURCE_OCR_AGENT,
        &OcrEnrichment::full_name(),
        &summary,
    )
    .await;
    if let Err(e) = logged {
        tracing::warn!("Failed to log event: {}", e);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
