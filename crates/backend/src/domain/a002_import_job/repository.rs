use contracts::domain::a002_import_job::{ImportJob, ImportJobId, JobErrorDetail, JobStatus};
use contracts::domain::common::AggregateId;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_import_job")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub job_type: String,
    pub status: String,
    pub file_name: String,
    pub total_rows: i64,
    pub success_count: i64,
    pub error_count: i64,
    /// JSON массив {row, sku, error}
    pub error_details: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ImportJob {
    fn from(m: Model) -> Self {
        let error_details: Vec<JobErrorDetail> =
            serde_json::from_str(&m.error_details).unwrap_or_default();
        ImportJob {
            id: ImportJobId::from_string(&m.id).unwrap_or_else(|_| ImportJobId::new_v4()),
            job_type: m.job_type,
            // незавершенный или неизвестный статус показываем как running
            status: JobStatus::parse(&m.status).unwrap_or(JobStatus::Running),
            file_name: m.file_name,
            total_rows: m.total_rows.max(0) as usize,
            success_count: m.success_count.max(0) as usize,
            error_count: m.error_count.max(0) as usize,
            error_details,
            started_at: m.started_at,
            finished_at: m.finished_at,
        }
    }
}

fn to_active(job: &ImportJob) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(job.id.as_string()),
        job_type: Set(job.job_type.clone()),
        status: Set(job.status.as_str().to_string()),
        file_name: Set(job.file_name.clone()),
        total_rows: Set(job.total_rows as i64),
        success_count: Set(job.success_count as i64),
        error_count: Set(job.error_count as i64),
        error_details: Set(serde_json::to_string(&job.error_details)?),
        started_at: Set(job.started_at),
        finished_at: Set(job.finished_at),
    })
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(job: &ImportJob) -> anyhow::Result<Uuid> {
    to_active(job)?.insert(conn()).await?;
    Ok(job.id.value())
}

pub async fn update(job: &ImportJob) -> anyhow::Result<()> {
    let mut active = to_active(job)?;
    active.started_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

/// Последние задания, новые сверху
pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<ImportJob>> {
    let items = Entity::find()
        .order_by_desc(Column::StartedAt)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

