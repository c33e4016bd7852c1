use async_trait::async_trait;
use contracts::domain::a001_product::{
    Product, ProductDraft, ProductFilter, ProductPatch, UpsertOutcome,
};

use super::repository;

/// Хранилище каталога, как его видят импорт и OCR-агент.
/// Каждая операция фиксируется сама по себе, общей транзакции нет.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self, filter: &ProductFilter) -> anyhow::Result<Vec<Product>>;

    async fn upsert_by_sku(&self, draft: ProductDraft) -> anyhow::Result<UpsertOutcome>;

    /// false, если товара с таким SKU нет
    async fn update_by_sku(&self, sku: &str, patch: &ProductPatch) -> anyhow::Result<bool>;
}

/// Реализация поверх глобального подключения sea-orm
#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmProductStore;

#[async_trait]
impl ProductStore for SeaOrmProductStore {
    async fn list(&self, filter: &ProductFilter) -> anyhow::Result<Vec<Product>> {
        repository::list(filter).await
    }

    async fn upsert_by_sku(&self, draft: ProductDraft) -> anyhow::Result<UpsertOutcome> {
        repository::upsert_by_sku(draft).await
    }

    async fn update_by_sku(&self, sku: &str, patch: &ProductPatch) -> anyhow::Result<bool> {
        repository::update_by_sku(sku, patch).await
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store for executor tests

    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryProductStore {
        pub items: Mutex<BTreeMap<String, Product>>,
        /// SKU, на которых запись должна падать
        pub failing_skus: HashSet<String>,
    }

    impl InMemoryProductStore {
        pub fn with_products(products: Vec<Product>) -> Self {
            let items = products.into_iter().map(|p| (p.sku.clone(), p)).collect();
            Self {
                items: Mutex::new(items),
                failing_skus: HashSet::new(),
            }
        }

        pub async fn get(&self, sku: &str) -> Option<Product> {
            self.items.lock().await.get(sku).cloned()
        }
    }

    #[async_trait]
    impl ProductStore for InMemoryProductStore {
        async fn list(&self, filter: &ProductFilter) -> anyhow::Result<Vec<Product>> {
            let items = self.items.lock().await;
            Ok(items.values().filter(|p| filter.matches(p)).cloned().collect())
        }

        async fn upsert_by_sku(&self, draft: ProductDraft) -> anyhow::Result<UpsertOutcome> {
            if self.failing_skus.contains(&draft.sku) {
                anyhow::bail!("write rejected for {}", draft.sku);
            }
            let mut items = self.items.lock().await;
            match items.get_mut(&draft.sku) {
                Some(existing) => {
                    existing.apply_draft(draft);
                    existing.before_write();
                    Ok(UpsertOutcome::Updated)
                }
                None => {
                    let mut product = Product::new_for_insert(draft);
                    product.before_write();
                    items.insert(product.sku.clone(), product);
                    Ok(UpsertOutcome::Inserted)
                }
            }
        }

        async fn update_by_sku(&self, sku: &str, patch: &ProductPatch) -> anyhow::Result<bool> {
            if self.failing_skus.contains(sku) {
                anyhow::bail!("write rejected for {}", sku);
            }
            let mut items = self.items.lock().await;
            let Some(existing) = items.get_mut(sku) else {
                return Ok(false);
            };
            existing.apply_patch(patch);
            existing.before_write();
            Ok(true)
        }
    }
}
