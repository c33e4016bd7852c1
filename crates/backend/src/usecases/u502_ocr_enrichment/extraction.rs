//! Извлечение цены, размеров, цвета и ткани из распознанного текста.
//!
//! Все правила задаются данными (`[ocr.rules]` в config.toml). Стратегии
//! проверяются в порядке объявления, побеждает первое совпадение.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

/// Шаблон размера. Если `label` задан, любое совпадение дает эту метку,
/// иначе берется первая группа (или все совпадение) в верхнем регистре.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SizePattern {
    pub pattern: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl SizePattern {
    fn new(pattern: &str, label: Option<&str>) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionRules {
    /// Регулярные выражения цены; число берется из первой группы
    pub price_patterns: Vec<String>,
    /// Цена принимается, только если строго больше этого порога
    pub min_price: i64,
    pub size_patterns: Vec<SizePattern>,
    /// Канонический порядок размеров; метки вне таблицы отбрасываются
    pub size_order: Vec<String>,
    pub color_keywords: Vec<String>,
    pub fabric_keywords: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        let mut size_order: Vec<String> = ["XS", "S", "M", "L", "XL", "XXL", "XXXL"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        size_order.extend((2..=10).map(|n| format!("{}XL", n)));
        size_order.push("Free Size".to_string());

        Self {
            price_patterns: vec![r"(?i)(?:Rs\.?|MUR|Price:?)\s*(\d{3,5})".to_string()],
            min_price: 100,
            size_patterns: vec![
                SizePattern::new(r"(?i)\b(XS|S|M|L|XL|XXL|XXXL)\b", None),
                SizePattern::new(r"(?i)\b(\d+)XL\b", None),
                SizePattern::new(r"(?i)free\s*size", Some("Free Size")),
            ],
            size_order,
            color_keywords: [
                "black", "white", "red", "blue", "green", "yellow", "pink", "purple", "brown",
                "gray", "beige", "navy", "maroon",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            fabric_keywords: [
                "cotton", "silk", "polyester", "wool", "leather", "denim", "linen", "chiffon",
                "satin",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Что удалось найти в тексте одного изображения
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub price: Option<i64>,
    pub sizes: Vec<String>,
    pub color: Option<String>,
    pub fabric: Option<String>,
}

struct CompiledSizePattern {
    regex: Regex,
    label: Option<String>,
}

/// Скомпилированные правила; строятся один раз на запуск агента
pub struct CompiledRules {
    price: Vec<Regex>,
    min_price: i64,
    sizes: Vec<CompiledSizePattern>,
    size_order: Vec<String>,
    colors: Vec<(String, Regex)>,
    fabrics: Vec<(String, Regex)>,
}

fn keyword_regex(keyword: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
}

fn compile_keywords(keywords: &[String]) -> Result<Vec<(String, Regex)>, regex::Error> {
    keywords
        .iter()
        .map(|k| Ok((capitalize(k), keyword_regex(k)?)))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Переводы строк в пробелы, серии пробелов схлопываются
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl CompiledRules {
    pub fn compile(rules: &ExtractionRules) -> Result<Self, regex::Error> {
        let price = rules
            .price_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let sizes = rules
            .size_patterns
            .iter()
            .map(|p| {
                Ok(CompiledSizePattern {
                    regex: Regex::new(&p.pattern)?,
                    label: p.label.clone(),
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            price,
            min_price: rules.min_price,
            sizes,
            size_order: rules.size_order.clone(),
            colors: compile_keywords(&rules.color_keywords)?,
            fabrics: compile_keywords(&rules.fabric_keywords)?,
        })
    }

    /// Первая стратегия, чье первое совпадение проходит порог, дает цену
    pub fn extract_price(&self, text: &str) -> Option<i64> {
        self.price.iter().find_map(|regex| {
            let caps = regex.captures(text)?;
            let value: i64 = caps.get(1)?.as_str().parse().ok()?;
            (value > self.min_price).then_some(value)
        })
    }

    /// Уникальные метки размеров в каноническом порядке
    pub fn extract_sizes(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for pattern in &self.sizes {
            for caps in pattern.regex.captures_iter(text) {
                let label = match &pattern.label {
                    Some(label) => label.clone(),
                    None => match caps.get(0) {
                        Some(m) => m.as_str().to_uppercase(),
                        None => continue,
                    },
                };
                if !found.contains(&label) {
                    found.push(label);
                }
            }
        }

        let mut ranked: Vec<(usize, String)> = found
            .into_iter()
            .filter_map(|label| {
                let rank = self.size_order.iter().position(|o| *o == label)?;
                Some((rank, label))
            })
            .collect();
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked.into_iter().map(|(_, label)| label).collect()
    }

    pub fn extract_color(&self, text: &str) -> Option<String> {
        first_keyword(&self.colors, text)
    }

    pub fn extract_fabric(&self, text: &str) -> Option<String> {
        first_keyword(&self.fabrics, text)
    }

    /// Полный разбор текста одного изображения
    pub fn extract(&self, raw_text: &str) -> Extracted {
        let text = normalize_text(raw_text);
        Extracted {
            price: self.extract_price(&text),
            sizes: self.extract_sizes(&text),
            color: self.extract_color(&text),
            fabric: self.extract_fabric(&text),
        }
    }
}

fn first_keyword(keywords: &[(String, Regex)], text: &str) -> Option<String> {
    keywords
        .iter()
        .find(|(_, regex)| regex.is_match(text))
        .map(|(label, _)| label.clone())
}
