pub mod repository;
pub mod service;
pub mod store;

pub use store::{ProductStore, SeaOrmProductStore};
