pub mod aggregate;

pub use aggregate::{
    Product, ProductDraft, ProductFilter, ProductId, ProductPatch, ProductStatus,
    PublishDraftsResult, SetStatusRequest, UpsertOutcome, Variant, DEFAULT_CATEGORY,
};
