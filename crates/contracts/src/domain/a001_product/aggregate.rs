use crate::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Категория по умолчанию для строк импорта без категории
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Не виден покупателям; все строки массового импорта создаются в этом статусе
    #[default]
    Draft,
    Active,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(ProductStatus::Draft),
            "active" => Some(ProductStatus::Active),
            "archived" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Variant
// ============================================================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub size: String,
    pub stock: i64,
}

impl Variant {
    pub fn new(size: impl Into<String>, stock: i64) -> Self {
        Self {
            size: size.into(),
            stock,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    /// Зеркало цены в рупиях (MUR), всегда пишется вместе с `price`
    #[serde(rename = "priceMur")]
    pub price_mur: f64,
    #[serde(rename = "stockQty")]
    pub stock_qty: i64,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    pub color: Option<String>,
    pub fabric: Option<String>,
    pub status: ProductStatus,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Product {
    /// Новый товар из данных импорта; id и метаданные создаются здесь
    pub fn new_for_insert(draft: ProductDraft) -> Self {
        Self {
            id: ProductId::new_v4(),
            sku: draft.sku,
            name: draft.name,
            category: draft.category,
            price: draft.price,
            price_mur: draft.price,
            stock_qty: draft.stock_qty.max(0),
            sizes: draft.sizes,
            variants: draft.variants,
            color: draft.color,
            fabric: draft.fabric,
            status: draft.status,
            image_url: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Перезаписать поля, пришедшие из импорта.
    /// id, created_at и image_url сохраняются.
    pub fn apply_draft(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.price = draft.price;
        self.price_mur = draft.price;
        self.stock_qty = draft.stock_qty.max(0);
        self.sizes = draft.sizes;
        self.variants = draft.variants;
        self.color = draft.color;
        self.fabric = draft.fabric;
        self.status = draft.status;
    }

    /// Применить частичное обновление (OCR, смена статуса)
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(price) = patch.price {
            self.price = price;
            self.price_mur = price;
        }
        if let Some(sizes) = &patch.sizes {
            self.sizes = sizes.clone();
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(fabric) = &patch.fabric {
            self.fabric = Some(fabric.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sku.trim().is_empty() {
            return Err("SKU cannot be empty".into());
        }
        if self.name.trim().is_empty() {
            return Err("Name cannot be empty".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("Invalid price: {}", self.price));
        }
        if self.stock_qty < 0 {
            return Err("Stock cannot be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
        self.metadata.increment_version();
    }

    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Готовая к записи строка импорта (после дефолтов и числового приведения)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock_qty: i64,
    pub sizes: Vec<String>,
    pub variants: Vec<Variant>,
    pub color: Option<String>,
    pub fabric: Option<String>,
    pub status: ProductStatus,
}

/// Частичное обновление товара по SKU; `None` означает "не трогать"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub price: Option<f64>,
    pub sizes: Option<Vec<String>>,
    pub color: Option<String>,
    pub fabric: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.sizes.is_none()
            && self.color.is_none()
            && self.fabric.is_none()
            && self.status.is_none()
    }
}

/// Фильтр выборки товаров
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub status: Option<ProductStatus>,
    pub skus: Option<Vec<String>>,
}

impl ProductFilter {
    pub fn by_status(status: ProductStatus) -> Self {
        Self {
            status: Some(status),
            skus: None,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(status) = self.status {
            if product.status != status {
                return false;
            }
        }
        if let Some(skus) = &self.skus {
            if !skus.iter().any(|s| s == &product.sku) {
                return false;
            }
        }
        true
    }
}

/// Результат upsert по SKU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Ответ публикации черновиков
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishDraftsResult {
    #[serde(rename = "publishedCount")]
    pub published_count: u64,
    #[serde(rename = "totalActiveProducts")]
    pub total_active_products: u64,
}

/// Запрос смены статуса одного товара
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: ProductStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(sku: &str) -> ProductDraft {
        ProductDraft {
            sku: sku.to_string(),
            name: "Anarkali Red".to_string(),
            category: "Suits".to_string(),
            price: 2500.0,
            stock_qty: 10,
            sizes: vec!["S".into(), "M".into()],
            variants: vec![Variant::new("S", 5), Variant::new("M", 5)],
            color: None,
            fabric: None,
            status: ProductStatus::Draft,
        }
    }

    #[test]
    fn test_new_for_insert_mirrors_price() {
        let p = Product::new_for_insert(draft("ANK-001"));
        assert_eq!(p.price, 2500.0);
        assert_eq!(p.price_mur, 2500.0);
        assert_eq!(p.status, ProductStatus::Draft);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_apply_draft_keeps_identity_and_image() {
        let mut p = Product::new_for_insert(draft("ANK-001"));
        p.image_url = Some("https://cdn.example/ank-001.jpg".into());
        p.status = ProductStatus::Active;
        let id = p.id;

        let mut next = draft("ANK-001");
        next.price = 2700.0;
        p.apply_draft(next);

        assert_eq!(p.id, id);
        assert_eq!(p.price_mur, 2700.0);
        assert_eq!(p.status, ProductStatus::Draft);
        assert_eq!(p.image_url.as_deref(), Some("https://cdn.example/ank-001.jpg"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ProductStatus::parse(" Active "), Some(ProductStatus::Active));
        assert_eq!(ProductStatus::parse("gone"), None);
        assert_eq!(
            serde_json::to_string(&ProductStatus::Archived).unwrap(),
            "\"archived\""
        );
    }

    #[test]
    fn test_filter_matches_status_and_skus() {
        let p = Product::new_for_insert(draft("A-1"));
        assert!(ProductFilter::default().matches(&p));
        assert!(ProductFilter::by_status(ProductStatus::Draft).matches(&p));
        assert!(!ProductFilter::by_status(ProductStatus::Active).matches(&p));
        let f = ProductFilter {
            status: None,
            skus: Some(vec!["B-2".into()]),
        };
        assert!(!f.matches(&p));
    }
}
