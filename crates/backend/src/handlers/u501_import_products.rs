use axum::{
    extract::{Multipart, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use contracts::domain::a002_import_job::ImportJob;
use contracts::usecases::common::{UseCaseError, UseCaseMetadata};
use contracts::usecases::u501_import_products::{
    ImportProducts, ImportRequest, ImportResponse, PreviewRequest, PreviewResponse,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::a001_product::SeaOrmProductStore;
use crate::domain::a002_import_job::{ImportJobStore, SeaOrmImportJobStore};
use crate::shared::logger;
use crate::usecases::u501_import_products::template::{TEMPLATE_CSV, TEMPLATE_FILE_NAME};
use crate::usecases::u501_import_products::{ImportError, ImportExecutor};

static IMPORT_EXECUTOR: Lazy<Arc<ImportExecutor>> = Lazy::new(|| {
    Arc::new(ImportExecutor::new(
        Arc::new(SeaOrmProductStore),
        Arc::new(SeaOrmImportJobStore),
    ))
});

const DEFAULT_JOBS_LIMIT: u64 = 50;

type ApiError = (StatusCode, Json<UseCaseError>);

fn api_error(err: &ImportError) -> ApiError {
    let status = match err {
        ImportError::MappingIncomplete(_) | ImportError::Csv(_) => StatusCode::BAD_REQUEST,
        ImportError::ConfirmationRequired { .. } => StatusCode::CONFLICT,
        ImportError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err.to_usecase_error()))
}

/// Содержимое загруженного файла; не UTF-8 отклоняется как некорректный CSV
fn decode_upload(file_name: &str, bytes: &[u8]) -> Result<String, ApiError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        tracing::warn!("Upload {} is not valid UTF-8: {}", file_name, e);
        (
            StatusCode::BAD_REQUEST,
            Json(UseCaseError::validation("Invalid CSV").with_details(e.to_string())),
        )
    })
}

/// GET /api/u501/template
pub async fn download_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILE_NAME),
            ),
        ],
        TEMPLATE_CSV,
    )
}

/// POST /api/u501/preview
pub async fn preview(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    IMPORT_EXECUTOR.preview(&request).map(Json).map_err(|e| {
        tracing::warn!("Preview of {} failed: {}", request.file_name, e);
        api_error(&e)
    })
}

/// POST /api/u501/upload (multipart, поле `file`)
pub async fn upload(mut multipart: Multipart) -> Result<Json<PreviewResponse>, ApiError> {
    let bad_request = |message: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(UseCaseError::validation(message)),
        )
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field.bytes().await.map_err(|e| bad_request(e.to_string()))?;
        tracing::info!("Received {} ({} bytes)", file_name, bytes.len());

        let request = PreviewRequest {
            csv_text: decode_upload(&file_name, &bytes)?,
            file_name,
            mapping: None,
        };
        return IMPORT_EXECUTOR
            .preview(&request)
            .map(Json)
            .map_err(|e| api_error(&e));
    }

    Err(bad_request("Multipart field 'file' is missing".to_string()))
}

/// POST /api/u501/import
pub async fn import(Json(request): Json<ImportRequest>) -> Result<Json<ImportResponse>, ApiError> {
    match IMPORT_EXECUTOR.import(&request).await {
        Ok(response) => {
            logger::log(
                &ImportProducts::full_name(),
                &format!(
                    "{}: {} imported ({} new, {} updated), {} errors",
                    request.file_name,
                    response.job.success_count,
                    response.inserted_count,
                    response.updated_count,
                    response.job.error_count
                ),
            );
            Ok(Json(response))
        }
        Err(e) => {
            match &e {
                ImportError::Store(_) => tracing::error!("Import of {} failed: {}", request.file_name, e),
                _ => tracing::warn!("Import of {} refused: {}", request.file_name, e),
            }
            Err(api_error(&e))
        }
    }
}

#[derive(Deserialize)]
pub struct JobsQuery {
    pub limit: Option<u64>,
}

/// GET /api/u501/jobs
pub async fn list_jobs(Query(query): Query<JobsQuery>) -> Result<Json<Vec<ImportJob>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_JOBS_LIMIT);
    match SeaOrmImportJobStore.list_recent(limit).await {
        Ok(jobs) => Ok(Json(jobs)),
        Err(e) => {
            tracing::error!("Failed to list import jobs: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let (status, body) = api_error(&ImportError::ConfirmationRequired { count: 3 });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.0.code, "CONFIRMATION_REQUIRED");

        let (status, body) = api_error(&ImportError::MappingIncomplete(vec![
            contracts::usecases::u501_import_products::CanonicalField::Category,
        ]));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.details.as_deref(), Some("category"));
    }

    #[test]
    fn test_upload_must_be_utf8() {
        assert_eq!(
            decode_upload("stock.csv", "sku,name\nK-1,Kurti\n".as_bytes()).unwrap(),
            "sku,name\nK-1,Kurti\n"
        );

        let (status, body) = decode_upload("stock.csv", b"sku,name\nK-1,Kurt\xff\n").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.code, "VALIDATION_ERROR");
        assert_eq!(body.0.message, "Invalid CSV");
    }
}
