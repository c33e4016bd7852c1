use async_trait::async_trait;
use contracts::domain::a002_import_job::ImportJob;

use super::repository;

/// Журнал заданий импорта
#[async_trait]
pub trait ImportJobStore: Send + Sync {
    /// Создать запись задания (статус running) до обработки строк
    async fn create(&self, job: &ImportJob) -> anyhow::Result<()>;

    /// Записать итоговые счетчики и статус
    async fn finish(&self, job: &ImportJob) -> anyhow::Result<()>;

    async fn list_recent(&self, limit: u64) -> anyhow::Result<Vec<ImportJob>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmImportJobStore;

#[async_trait]
impl ImportJobStore for SeaOrmImportJobStore {
    async fn create(&self, job: &ImportJob) -> anyhow::Result<()> {
        repository::insert(job).await?;
        Ok(())
    }

    async fn finish(&self, job: &ImportJob) -> anyhow::Result<()> {
        repository::update(job).await
    }

    async fn list_recent(&self, limit: u64) -> anyhow::Result<Vec<ImportJob>> {
        repository::list_recent(limit).await
    }
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryImportJobStore {
        pub jobs: Mutex<Vec<ImportJob>>,
        pub fail_create: bool,
    }

    #[async_trait]
    impl ImportJobStore for InMemoryImportJobStore {
        async fn create(&self, job: &ImportJob) -> anyhow::Result<()> {
            if self.fail_create {
                anyhow::bail!("job table unavailable");
            }
            self.jobs.lock().await.push(job.clone());
            Ok(())
        }

        async fn finish(&self, job: &ImportJob) -> anyhow::Result<()> {
            let mut jobs = self.jobs.lock().await;
            match jobs.iter_mut().find(|j| j.id == job.id) {
                Some(existing) => *existing = job.clone(),
                None => anyhow::bail!("job {} not found", job.id.value()),
            }
            Ok(())
        }

        async fn list_recent(&self, limit: u64) -> anyhow::Result<Vec<ImportJob>> {
            let jobs = self.jobs.lock().await;
            Ok(jobs.iter().rev().take(limit as usize).cloned().collect())
        }
    }
}
