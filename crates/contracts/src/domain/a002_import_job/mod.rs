pub mod aggregate;

pub use aggregate::{ImportJob, ImportJobId, JobErrorDetail, JobStatus, JOB_TYPE_SMART_IMPORT};
