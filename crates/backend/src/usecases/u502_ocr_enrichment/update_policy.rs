use contracts::domain::a001_product::{Product, ProductPatch};
use contracts::usecases::u502_ocr_enrichment::FieldChange;
use serde::{Deserialize, Serialize};

use super::extraction::Extracted;

/// Когда найденное значение записывается поверх текущего
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    Always,
    /// Только если текущее значение пустое
    IfEmpty,
    /// Только если найденное значение отличается от текущего
    IfDifferent,
}

/// Политика для каждого поля, которое умеет заполнять OCR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPolicies {
    pub price: UpdatePolicy,
    pub sizes: UpdatePolicy,
    pub color: UpdatePolicy,
    pub fabric: UpdatePolicy,
}

impl Default for FieldPolicies {
    fn default() -> Self {
        Self {
            price: UpdatePolicy::IfDifferent,
            sizes: UpdatePolicy::IfEmpty,
            color: UpdatePolicy::IfEmpty,
            fabric: UpdatePolicy::IfEmpty,
        }
    }
}

impl UpdatePolicy {
    pub fn allows<T: PartialEq + ?Sized>(&self, current: &T, found: &T, current_empty: bool) -> bool {
        match self {
            UpdatePolicy::Always => true,
            UpdatePolicy::IfEmpty => current_empty,
            UpdatePolicy::IfDifferent => current != found,
        }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Собрать частичное обновление из найденного в тексте.
/// Пустой патч означает "ничего не менять".
pub fn build_patch(
    product: &Product,
    found: &Extracted,
    policies: &FieldPolicies,
) -> (ProductPatch, Vec<FieldChange>) {
    let mut patch = ProductPatch::default();
    let mut changes = Vec::new();

    if let Some(price) = found.price {
        let price = price as f64;
        if policies
            .price
            .allows(&product.price, &price, product.price <= 0.0)
        {
            patch.price = Some(price);
            changes.push(FieldChange::Price {
                from: product.price,
                to: price,
            });
        }
    }

    if !found.sizes.is_empty()
        && policies
            .sizes
            .allows(&product.sizes, &found.sizes, !product.has_sizes())
    {
        patch.sizes = Some(found.sizes.clone());
        changes.push(FieldChange::Sizes {
            to: found.sizes.clone(),
        });
    }

    if let Some(color) = &found.color {
        let current = product.color.clone().unwrap_or_default();
        if policies.color.allows(&current, color, blank(&product.color)) {
            patch.color = Some(color.clone());
            changes.push(FieldChange::Color { to: color.clone() });
        }
    }

    if let Some(fabric) = &found.fabric {
        let current = product.fabric.clone().unwrap_or_default();
        if policies.fabric.allows(&current, fabric, blank(&product.fabric)) {
            patch.fabric = Some(fabric.clone());
            changes.push(FieldChange::Fabric { to: fabric.clone() });
        }
    }

    (patch, changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::{ProductDraft, ProductStatus};

    fn product(price: f64, sizes: &[&str]) -> Product {
        Product::new_for_insert(ProductDraft {
            sku: "ANK-001".into(),
            name: "Anarkali Red".into(),
            category: "Suits".into(),
            price,
            stock_qty: 0,
            sizes: sizes.iter().map(|s| s.to_string()).collect(),
            variants: vec![],
            color: None,
            fabric: Some("Georgette".into()),
            status: ProductStatus::Draft,
        })
    }

    fn found(price: Option<i64>, sizes: &[&str]) -> Extracted {
        Extracted {
            price,
            sizes: sizes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_price_written_when_different() {
        let p = product(2000.0, &[]);
        let (patch, changes) = build_patch(&p, &found(Some(2500), &[]), &FieldPolicies::default());
        assert_eq!(patch.price, Some(2500.0));
        assert_eq!(
            changes,
            vec![FieldChange::Price {
                from: 2000.0,
                to: 2500.0
            }]
        );
    }

    #[test]
    fn test_same_price_is_not_rewritten() {
        let p = product(2500.0, &[]);
        let (patch, _) = build_patch(&p, &found(Some(2500), &[]), &FieldPolicies::default());
        assert!(patch.is_empty());
    }

    #[test]
    fn test_existing_sizes_are_kept() {
        let p = product(2500.0, &["M"]);
        let (patch, changes) =
            build_patch(&p, &found(None, &["S", "L"]), &FieldPolicies::default());
        assert!(patch.sizes.is_none());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_empty_sizes_are_filled() {
        let p = product(2500.0, &[]);
        let (patch, _) = build_patch(&p, &found(None, &["S", "L"]), &FieldPolicies::default());
        assert_eq!(patch.sizes, Some(vec!["S".to_string(), "L".to_string()]));
    }

    #[test]
    fn test_always_policy_overwrites_sizes() {
        let p = product(2500.0, &["M"]);
        let policies = FieldPolicies {
            sizes: UpdatePolicy::Always,
            ..Default::default()
        };
        let (patch, _) = build_patch(&p, &found(None, &["S", "L"]), &policies);
        assert_eq!(patch.sizes, Some(vec!["S".to_string(), "L".to_string()]));
    }

    #[test]
    fn test_fabric_not_overwritten_color_filled() {
        let p = product(2500.0, &[]);
        let extracted = Extracted {
            color: Some("Red".into()),
            fabric: Some("Silk".into()),
            ..Default::default()
        };
        let (patch, _) = build_patch(&p, &extracted, &FieldPolicies::default());
        assert_eq!(patch.color.as_deref(), Some("Red"));
        assert!(patch.fabric.is_none());
    }
}
