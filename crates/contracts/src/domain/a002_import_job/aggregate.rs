use crate::domain::common::AggregateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Тип задания для массового импорта из CSV
pub const JOB_TYPE_SMART_IMPORT: &str = "smart_import";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportJobId(pub Uuid);

impl ImportJobId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ImportJobId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ImportJobId)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Done,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(JobStatus::Running),
            "done" => Some(JobStatus::Done),
            _ => None,
        }
    }
}

/// Ошибка по одной строке файла
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobErrorDetail {
    pub row: usize,
    pub sku: String,
    pub error: String,
}

/// Сводка одного запуска импорта (для аудита оператором)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: ImportJobId,
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: JobStatus,
    pub file_name: String,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub error_details: Vec<JobErrorDetail>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportJob {
    /// Новое задание в статусе `running`
    pub fn start(job_type: &str, file_name: &str, total_rows: usize) -> Self {
        Self {
            id: ImportJobId::new_v4(),
            job_type: job_type.to_string(),
            status: JobStatus::Running,
            file_name: file_name.to_string(),
            total_rows,
            success_count: 0,
            error_count: 0,
            error_details: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_error(&mut self, detail: JobErrorDetail) {
        self.error_count += 1;
        self.error_details.push(detail);
    }

    pub fn finish(&mut self) {
        self.status = JobStatus::Done;
        self.finished_at = Some(Utc::now());
    }
}
