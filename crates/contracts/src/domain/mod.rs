pub mod a001_product;
pub mod a002_import_job;
pub mod common;
