use super::{column_mapper, csv_parser, transformer, validator};
use crate::domain::a001_product::ProductStore;
use crate::domain::a002_import_job::ImportJobStore;
use contracts::domain::a001_product::{ProductDraft, ProductStatus, UpsertOutcome, DEFAULT_CATEGORY};
use contracts::domain::a002_import_job::{ImportJob, JobErrorDetail, JOB_TYPE_SMART_IMPORT};
use contracts::usecases::common::UseCaseError;
use contracts::usecases::u501_import_products::{
    row_number, CanonicalField, CanonicalRow, ColumnMapping, ImportRequest, ImportResponse,
    PreviewRequest, PreviewResponse, RowOutcome, RowStatus,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Ошибки уровня пакета. Ошибки отдельных строк сюда не попадают.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Required fields are not mapped: {}", field_keys(.0))]
    MappingIncomplete(Vec<CanonicalField>),

    #[error("There are {count} validation errors. These rows will be skipped. Confirm to continue")]
    ConfirmationRequired { count: usize },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(anyhow::Error),
}

fn field_keys(fields: &[CanonicalField]) -> String {
    fields.iter().map(|f| f.key()).collect::<Vec<_>>().join(", ")
}

impl ImportError {
    /// Представление для ответа API
    pub fn to_usecase_error(&self) -> UseCaseError {
        match self {
            ImportError::MappingIncomplete(fields) => {
                UseCaseError::validation("Mapping incomplete").with_details(field_keys(fields))
            }
            ImportError::ConfirmationRequired { .. } => {
                UseCaseError::confirmation_required(self.to_string())
            }
            ImportError::Csv(e) => UseCaseError::validation("Invalid CSV").with_details(e.to_string()),
            ImportError::Store(e) => UseCaseError::internal(e.to_string()),
        }
    }
}

/// Строка импорта → данные для записи: дефолты и числовое приведение.
/// Статус всегда draft, даже при обновлении существующего товара.
pub fn to_draft(row: &CanonicalRow) -> ProductDraft {
    let price = row
        .selling_price
        .as_deref()
        .and_then(transformer::parse_leading_float)
        .unwrap_or(0.0);
    let stock_qty = row
        .stock_qty
        .as_deref()
        .and_then(transformer::parse_leading_int)
        .unwrap_or(0)
        .max(0);

    ProductDraft {
        sku: row.sku.clone().unwrap_or_default(),
        name: row.name.clone().unwrap_or_default(),
        category: row
            .category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        price,
        stock_qty,
        sizes: row.sizes.clone(),
        variants: row.variants.clone(),
        color: row.color.clone(),
        fabric: row.fabric.clone(),
        status: ProductStatus::Draft,
    }
}

/// Обязательные поля без привязки. Канонический файл (auto_detected) не проверяется:
/// отсутствующие колонки получают дефолты при записи.
fn unmapped_required(mapping: &ColumnMapping, auto_detected: bool) -> Vec<CanonicalField> {
    if auto_detected {
        Vec::new()
    } else {
        mapping.missing_required()
    }
}

/// Executor массового импорта товаров из CSV
pub struct ImportExecutor {
    products: Arc<dyn ProductStore>,
    jobs: Arc<dyn ImportJobStore>,
}

impl ImportExecutor {
    pub fn new(products: Arc<dyn ProductStore>, jobs: Arc<dyn ImportJobStore>) -> Self {
        Self { products, jobs }
    }

    /// Разбор, сопоставление и проверка без записи
    pub fn preview(&self, request: &PreviewRequest) -> Result<PreviewResponse, ImportError> {
        let parsed = csv_parser::parse_csv(&request.csv_text)?;
        let (mapping, auto_detected) =
            column_mapper::resolve(&parsed.headers, request.mapping.as_ref());
        let rows = transformer::transform_rows(&parsed.rows, &mapping);
        let validation_errors = validator::validate(&rows);

        tracing::info!(
            "Preview {}: {} rows, {} validation errors, auto_detected={}",
            request.file_name,
            rows.len(),
            validation_errors.len(),
            auto_detected
        );

        Ok(PreviewResponse {
            file_name: request.file_name.clone(),
            headers: parsed.headers,
            missing_required: unmapped_required(&mapping, auto_detected),
            mapping,
            auto_detected,
            total_rows: rows.len(),
            rows,
            validation_errors,
        })
    }

    /// Запись пакета. Каждая строка фиксируется отдельно; сбой строки не
    /// прерывает пакет, сбой создания задания прерывает до первой строки.
    pub async fn import(&self, request: &ImportRequest) -> Result<ImportResponse, ImportError> {
        let parsed = csv_parser::parse_csv(&request.csv_text)?;
        let (mapping, auto_detected) =
            column_mapper::resolve(&parsed.headers, request.mapping.as_ref());
        let missing = unmapped_required(&mapping, auto_detected);
        if !missing.is_empty() {
            return Err(ImportError::MappingIncomplete(missing));
        }

        let rows = transformer::transform_rows(&parsed.rows, &mapping);
        let validation_errors = validator::validate(&rows);
        if !validation_errors.is_empty() && !request.continue_despite_errors {
            return Err(ImportError::ConfirmationRequired {
                count: validation_errors.len(),
            });
        }

        let invalid: HashMap<usize, String> = validation_errors
            .iter()
            .map(|e| (e.row, e.errors.join(", ")))
            .collect();

        let mut job = ImportJob::start(JOB_TYPE_SMART_IMPORT, &request.file_name, rows.len());
        self.jobs.create(&job).await.map_err(ImportError::Store)?;

        tracing::info!(
            "Import job {} started: {} rows from {}",
            job.id.value(),
            rows.len(),
            request.file_name
        );

        let mut outcomes = Vec::with_capacity(rows.len());
        let mut inserted_count = 0;
        let mut updated_count = 0;

        for (index, row) in rows.iter().enumerate() {
            let row_no = row_number(index);
            let sku = row.sku.clone().unwrap_or_default();

            if let Some(messages) = invalid.get(&row_no) {
                job.record_error(JobErrorDetail {
                    row: row_no,
                    sku: sku.clone(),
                    error: messages.clone(),
                });
                outcomes.push(RowOutcome {
                    row: row_no,
                    sku,
                    status: RowStatus::Skipped,
                });
                continue;
            }

            let status = match self.products.upsert_by_sku(to_draft(row)).await {
                Ok(outcome) => {
                    job.record_success();
                    match outcome {
                        UpsertOutcome::Inserted => {
                            inserted_count += 1;
                            RowStatus::Inserted
                        }
                        UpsertOutcome::Updated => {
                            updated_count += 1;
                            RowStatus::Updated
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Row {} ({}) failed: {}", row_no, sku, e);
                    job.record_error(JobErrorDetail {
                        row: row_no,
                        sku: sku.clone(),
                        error: e.to_string(),
                    });
                    RowStatus::Failed
                }
            };
            outcomes.push(RowOutcome {
                row: row_no,
                sku,
                status,
            });
        }

        job.finish();
        if let Err(e) = self.jobs.finish(&job).await {
            // строки уже записаны, итог отдаем даже без сохраненной сводки
            tracing::error!("Failed to finish import job {}: {}", job.id.value(), e);
        }

        tracing::info!(
            "Import job {} done: {} ok ({} inserted, {} updated), {} errors",
            job.id.value(),
            job.success_count,
            inserted_count,
            updated_count,
            job.error_count
        );

        Ok(ImportResponse {
            job,
            inserted_count,
            updated_count,
            rows: outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product::store::memory::InMemoryProductStore;
    use crate::domain::a002_import_job::store::memory::InMemoryImportJobStore;
    use contracts::domain::a001_product::Variant;
    use contracts::domain::a002_import_job::JobStatus;

    struct Fixture {
        products: Arc<InMemoryProductStore>,
        jobs: Arc<InMemoryImportJobStore>,
        executor: ImportExecutor,
    }

    fn fixture_with(products: InMemoryProductStore, jobs: InMemoryImportJobStore) -> Fixture {
        let products = Arc::new(products);
        let jobs = Arc::new(jobs);
        let executor = ImportExecutor::new(products.clone(), jobs.clone());
        Fixture {
            products,
            jobs,
            executor,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(InMemoryProductStore::default(), InMemoryImportJobStore::default())
    }

    fn request(csv: &str, confirm: bool) -> ImportRequest {
        ImportRequest {
            file_name: "stock.csv".into(),
            csv_text: csv.into(),
            mapping: None,
            continue_despite_errors: confirm,
        }
    }

    const BASIC: &str = "SKU,Name,Category,Price,Stock,Sizes\nANK-001,Anarkali Red,Suits,2500,10,S:5;M:3;L:2\n";

    #[tokio::test]
    async fn test_basic_row_becomes_draft() {
        let f = fixture();
        let response = f.executor.import(&request(BASIC, false)).await.unwrap();

        assert_eq!(response.inserted_count, 1);
        let p = f.products.get("ANK-001").await.unwrap();
        assert_eq!(p.price, 2500.0);
        assert_eq!(p.price_mur, 2500.0);
        assert_eq!(p.stock_qty, 10);
        assert_eq!(p.sizes, vec!["S", "M", "L"]);
        assert_eq!(
            p.variants,
            vec![Variant::new("S", 5), Variant::new("M", 3), Variant::new("L", 2)]
        );
        assert_eq!(p.status, ProductStatus::Draft);

        let jobs = f.jobs.jobs.lock().await;
        assert_eq!(jobs[0].status, JobStatus::Done);
        assert_eq!(jobs[0].success_count, 1);
        assert_eq!(jobs[0].total_rows, 1);
    }

    #[tokio::test]
    async fn test_second_import_updates_same_sku() {
        let f = fixture();
        f.executor.import(&request(BASIC, false)).await.unwrap();
        {
            let mut items = f.products.items.lock().await;
            let p = items.get_mut("ANK-001").unwrap();
            p.status = ProductStatus::Active;
            p.image_url = Some("https://cdn.example/ank-001.jpg".into());
        }

        let second = f.executor.import(&request(BASIC, false)).await.unwrap();
        assert_eq!(second.rows[0].status, RowStatus::Updated);
        assert_eq!(second.updated_count, 1);
        assert_eq!(f.products.items.lock().await.len(), 1);

        let p = f.products.get("ANK-001").await.unwrap();
        assert_eq!(p.status, ProductStatus::Draft);
        assert_eq!(p.image_url.as_deref(), Some("https://cdn.example/ank-001.jpg"));
    }

    #[tokio::test]
    async fn test_duplicate_sku_requires_confirmation_then_skips() {
        let f = fixture();
        let csv = "sku,name,category,selling_price\nDUP-1,First,Suits,1000\nDUP-1,Second,Suits,1200\n";

        let refused = f.executor.import(&request(csv, false)).await;
        assert!(matches!(
            refused,
            Err(ImportError::ConfirmationRequired { count: 1 })
        ));
        assert!(f.jobs.jobs.lock().await.is_empty());
        assert!(f.products.items.lock().await.is_empty());

        let response = f.executor.import(&request(csv, true)).await.unwrap();
        assert_eq!(response.rows[0].status, RowStatus::Inserted);
        assert_eq!(response.rows[1].status, RowStatus::Skipped);
        assert_eq!(response.job.error_count, 1);
        assert_eq!(response.job.error_details[0].row, 3);
        assert_eq!(response.job.error_details[0].error, "Duplicate SKU in file");
        assert_eq!(f.products.get("DUP-1").await.unwrap().name, "First");
    }

    #[tokio::test]
    async fn test_invalid_price_row_is_skipped() {
        let f = fixture();
        let csv = "sku,name,category,selling_price\nA-1,Good,Suits,900\nB-2,Bad,Suits,abc\n";
        let response = f.executor.import(&request(csv, true)).await.unwrap();

        assert_eq!(response.job.success_count, 1);
        assert_eq!(response.job.error_count, 1);
        assert_eq!(response.job.error_details[0].error, "Invalid Price");
        assert!(f.products.get("B-2").await.is_none());
    }

    #[tokio::test]
    async fn test_store_failure_is_recorded_per_row() {
        let mut products = InMemoryProductStore::default();
        products.failing_skus.insert("BAD-1".into());
        let f = fixture_with(products, InMemoryImportJobStore::default());
        let csv = "sku,name,category,selling_price\nBAD-1,Broken,Suits,900\nOK-2,Fine,,900\n";

        let response = f.executor.import(&request(csv, false)).await.unwrap();
        assert_eq!(response.rows[0].status, RowStatus::Failed);
        assert_eq!(response.rows[1].status, RowStatus::Inserted);
        assert_eq!(response.job.error_count, 1);
        assert_eq!(response.job.status, JobStatus::Done);
        assert_eq!(f.products.get("OK-2").await.unwrap().category, DEFAULT_CATEGORY);
    }

    #[tokio::test]
    async fn test_job_creation_failure_aborts_batch() {
        let jobs = InMemoryImportJobStore {
            fail_create: true,
            ..Default::default()
        };
        let f = fixture_with(InMemoryProductStore::default(), jobs);

        let result = f.executor.import(&request(BASIC, false)).await;
        assert!(matches!(result, Err(ImportError::Store(_))));
        assert!(f.products.items.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_mapping_is_refused() {
        let f = fixture();
        let csv = "Item Code,Title,Dept,MRP\nK-1,Kurti,Women,900\n";
        let result = f.executor.import(&request(csv, false)).await;
        match result {
            Err(ImportError::MappingIncomplete(missing)) => {
                assert_eq!(missing, vec![CanonicalField::Category])
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.rows)),
        }

        let mut mapping = ColumnMapping::default();
        mapping.bind(CanonicalField::Sku, "Item Code");
        mapping.bind(CanonicalField::Name, "Title");
        mapping.bind(CanonicalField::Category, "Dept");
        mapping.bind(CanonicalField::SellingPrice, "MRP");
        let confirmed = ImportRequest {
            mapping: Some(mapping),
            ..request(csv, false)
        };
        let response = f.executor.import(&confirmed).await.unwrap();
        assert_eq!(response.inserted_count, 1);
        assert_eq!(f.products.get("K-1").await.unwrap().category, "Women");
    }

    #[tokio::test]
    async fn test_canonical_file_without_category_imports_uncategorized() {
        let f = fixture();
        let csv = "sku,name,selling_price\nK-1,Kurti,900\n";
        let response = f.executor.import(&request(csv, false)).await.unwrap();
        assert_eq!(response.inserted_count, 1);

        let p = f.products.get("K-1").await.unwrap();
        assert_eq!(p.category, DEFAULT_CATEGORY);
        assert_eq!(p.price, 900.0);
    }

    #[test]
    fn test_preview_reports_without_writing() {
        let f = fixture();
        let preview = f
            .executor
            .preview(&PreviewRequest {
                file_name: "stock.csv".into(),
                csv_text: "sku,name,selling_price\n,No sku,abc\n".into(),
                mapping: None,
            })
            .unwrap();

        assert!(preview.auto_detected);
        assert!(preview.missing_required.is_empty());
        assert_eq!(preview.validation_errors.len(), 1);
        assert_eq!(preview.validation_errors[0].row, 2);
        assert_eq!(
            preview.validation_errors[0].errors,
            vec!["SKU is missing", "Invalid Price"]
        );
    }

    #[test]
    fn test_draft_defaults() {
        let row = CanonicalRow {
            sku: Some("X".into()),
            name: Some("Y".into()),
            selling_price: Some("12.5".into()),
            stock_qty: Some("-4".into()),
            ..Default::default()
        };
        let draft = to_draft(&row);
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert_eq!(draft.price, 12.5);
        assert_eq!(draft.stock_qty, 0);
        assert_eq!(draft.status, ProductStatus::Draft);
    }
}
