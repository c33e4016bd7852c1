use super::extraction::CompiledRules;
use super::image_locator::ImageLocator;
use super::text_recognizer::TextRecognizer;
use super::update_policy::{build_patch, FieldPolicies};
use crate::domain::a001_product::ProductStore;
use crate::shared::config::OcrConfig;
use anyhow::Result;
use contracts::domain::a001_product::{Product, ProductFilter};
use contracts::usecases::u502_ocr_enrichment::{OcrRunReport, ProductChange};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Исход обработки одного товара
enum ItemOutcome {
    NoImage,
    Unchanged,
    Updated(ProductChange),
}

/// Executor пакетного OCR-обогащения каталога.
/// Товары обрабатываются строго по одному, с паузой после каждого изображения.
pub struct OcrEnrichmentExecutor {
    store: Arc<dyn ProductStore>,
    recognizer: Arc<dyn TextRecognizer>,
    locator: ImageLocator,
    rules: CompiledRules,
    policies: FieldPolicies,
    delay: Duration,
}

impl OcrEnrichmentExecutor {
    pub fn new(
        store: Arc<dyn ProductStore>,
        recognizer: Arc<dyn TextRecognizer>,
        config: &OcrConfig,
    ) -> Result<Self> {
        let rules = CompiledRules::compile(&config.rules)
            .map_err(|e| anyhow::anyhow!("Invalid OCR extraction rule: {}", e))?;
        let locator = ImageLocator::scan(config.image_dir.as_deref().map(Path::new))?;
        Ok(Self {
            store,
            recognizer,
            locator,
            rules,
            policies: config.policies,
            delay: config.delay(),
        })
    }

    /// Пройти по всем товарам с SKU. Ошибка по товару не прерывает запуск.
    pub async fn run(&self) -> Result<OcrRunReport> {
        let products = self.store.list(&ProductFilter::default()).await?;
        let mut report = OcrRunReport::default();

        tracing::info!("Scanning {} products", products.len());

        for product in products.iter().filter(|p| !p.sku.trim().is_empty()) {
            report.scanned += 1;

            match self.process(product).await {
                Ok(ItemOutcome::NoImage) => {
                    report.skipped_no_image += 1;
                    tracing::debug!("{}: no image", product.sku);
                    continue;
                }
                Ok(ItemOutcome::Unchanged) => {
                    report.processed += 1;
                }
                Ok(ItemOutcome::Updated(change)) => {
                    report.processed += 1;
                    report.updated += 1;
                    tracing::info!("{}: {:?}", product.sku, change.changes);
                    report.changes.push(change);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!("{}: {}", product.sku, e);
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        tracing::info!(
            "OCR run completed: scanned={}, processed={}, updated={}, failed={}, no_image={}",
            report.scanned,
            report.processed,
            report.updated,
            report.failed,
            report.skipped_no_image
        );
        Ok(report)
    }

    async fn process(&self, product: &Product) -> Result<ItemOutcome> {
        let Some(image) = self
            .locator
            .locate(&product.sku, product.image_url.as_deref())
        else {
            return Ok(ItemOutcome::NoImage);
        };

        let text = self.recognizer.recognize(&image).await?;
        let found = self.rules.extract(&text);
        let (patch, changes) = build_patch(product, &found, &self.policies);
        if patch.is_empty() {
            return Ok(ItemOutcome::Unchanged);
        }

        if !self.store.update_by_sku(&product.sku, &patch).await? {
            anyhow::bail!("product disappeared before update");
        }
        Ok(ItemOutcome::Updated(ProductChange {
            sku: product.sku.clone(),
            changes,
        }))
    }
}
