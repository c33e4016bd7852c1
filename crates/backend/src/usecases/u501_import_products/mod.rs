pub mod column_mapper;
pub mod csv_parser;
pub mod executor;
pub mod template;
pub mod transformer;
pub mod validator;

pub use executor::{ImportError, ImportExecutor};
