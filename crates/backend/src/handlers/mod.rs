pub mod a001_product;
pub mod logs;
pub mod u501_import_products;
