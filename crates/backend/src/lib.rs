pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod usecases;
