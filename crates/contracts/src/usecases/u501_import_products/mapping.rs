use serde::{Deserialize, Serialize};

/// Поле товара, которое понимает система, независимо от заголовков файла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Sku,
    Name,
    Category,
    SellingPrice,
    StockQty,
    Sizes,
    Color,
    Fabric,
}

/// Описание поля: ключ, подпись, обязательность и алиасы для нечеткого сопоставления
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: CanonicalField,
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Подстроки заголовка, проверяются в порядке объявления
    pub aliases: &'static [&'static str],
}

/// Таблица полей в порядке объявления. Порядок определяет tie-break при сопоставлении.
pub const FIELD_SPECS: [FieldSpec; 8] = [
    FieldSpec {
        field: CanonicalField::Sku,
        key: "sku",
        label: "SKU (Unique ID)",
        required: true,
        aliases: &["sku", "id", "code", "item no", "product code", "ref"],
    },
    FieldSpec {
        field: CanonicalField::Name,
        key: "name",
        label: "Product Name",
        required: true,
        aliases: &["name", "title", "product name", "description", "item"],
    },
    FieldSpec {
        field: CanonicalField::Category,
        key: "category",
        label: "Category",
        required: true,
        aliases: &["category", "cat", "department", "group"],
    },
    FieldSpec {
        field: CanonicalField::SellingPrice,
        key: "selling_price",
        label: "Selling Price",
        required: true,
        aliases: &["price", "selling price", "mrp", "cost", "amount"],
    },
    FieldSpec {
        field: CanonicalField::StockQty,
        key: "stock_qty",
        label: "Total Stock",
        required: false,
        aliases: &["stock", "qty", "quantity", "inventory", "count"],
    },
    FieldSpec {
        field: CanonicalField::Sizes,
        key: "sizes",
        label: "Sizes",
        required: false,
        aliases: &["size", "sizes", "variant"],
    },
    FieldSpec {
        field: CanonicalField::Color,
        key: "color",
        label: "Color",
        required: false,
        aliases: &["color", "colour", "shade"],
    },
    FieldSpec {
        field: CanonicalField::Fabric,
        key: "fabric",
        label: "Fabric/Material",
        required: false,
        aliases: &["fabric", "material", "comp"],
    },
];

impl CanonicalField {
    pub fn spec(&self) -> &'static FieldSpec {
        // FIELD_SPECS объявлен в том же порядке, что и варианты enum
        &FIELD_SPECS[*self as usize]
    }

    pub fn key(&self) -> &'static str {
        self.spec().key
    }

    pub fn is_required(&self) -> bool {
        self.spec().required
    }

    pub fn all() -> impl Iterator<Item = CanonicalField> {
        FIELD_SPECS.iter().map(|s| s.field)
    }
}

/// Сопоставление "поле системы → заголовок файла".
/// Строится один раз на пакет; после подтверждения оператором не меняется.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_qty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
}

impl ColumnMapping {
    fn slot(&self, field: CanonicalField) -> &Option<String> {
        match field {
            CanonicalField::Sku => &self.sku,
            CanonicalField::Name => &self.name,
            CanonicalField::Category => &self.category,
            CanonicalField::SellingPrice => &self.selling_price,
            CanonicalField::StockQty => &self.stock_qty,
            CanonicalField::Sizes => &self.sizes,
            CanonicalField::Color => &self.color,
            CanonicalField::Fabric => &self.fabric,
        }
    }

    fn slot_mut(&mut self, field: CanonicalField) -> &mut Option<String> {
        match field {
            CanonicalField::Sku => &mut self.sku,
            CanonicalField::Name => &mut self.name,
            CanonicalField::Category => &mut self.category,
            CanonicalField::SellingPrice => &mut self.selling_price,
            CanonicalField::StockQty => &mut self.stock_qty,
            CanonicalField::Sizes => &mut self.sizes,
            CanonicalField::Color => &mut self.color,
            CanonicalField::Fabric => &mut self.fabric,
        }
    }

    /// Заголовок файла для поля; пустая строка считается "не сопоставлено"
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.slot(field).as_deref().filter(|h| !h.is_empty())
    }

    /// Привязать поле к заголовку (ручная правка оператором)
    pub fn bind(&mut self, field: CanonicalField, header: impl Into<String>) {
        *self.slot_mut(field) = Some(header.into());
    }

    /// Обязательные поля без привязки, в порядке объявления
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::all()
            .filter(|f| f.is_required() && self.get(*f).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_follow_enum_order() {
        for (idx, spec) in FIELD_SPECS.iter().enumerate() {
            assert_eq!(spec.field as usize, idx);
        }
        assert_eq!(CanonicalField::SellingPrice.key(), "selling_price");
    }

    #[test]
    fn test_missing_required_ignores_empty_binding() {
        let mut mapping = ColumnMapping::default();
        mapping.bind(CanonicalField::Sku, "Item Code");
        mapping.bind(CanonicalField::Name, "");
        mapping.bind(CanonicalField::StockQty, "Qty");

        assert_eq!(
            mapping.missing_required(),
            vec![
                CanonicalField::Name,
                CanonicalField::Category,
                CanonicalField::SellingPrice
            ]
        );
        assert!(!mapping.is_complete());
    }

    #[test]
    fn test_mapping_json_uses_canonical_keys() {
        let mut mapping = ColumnMapping::default();
        mapping.bind(CanonicalField::SellingPrice, "MRP");
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json, serde_json::json!({ "selling_price": "MRP" }));
    }
}
