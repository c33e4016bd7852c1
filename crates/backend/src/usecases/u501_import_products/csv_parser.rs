use std::collections::HashMap;

/// Сырая строка файла: заголовок → значение
pub type RawRow = HashMap<String, String>;

/// Разобранный файл: заголовки в порядке колонок и строки данных
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

const UTF8_BOM: char = '\u{feff}';

/// Разбор CSV с заголовком.
/// Пустые строки пропускаются; короткие строки допустимы (недостающие колонки
/// просто отсутствуют в строке), лишние значения без заголовка отбрасываются.
/// При повторе заголовка берется первая колонка.
pub fn parse_csv(text: &str) -> Result<ParsedCsv, csv::Error> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(record.iter()) {
            row.entry(header.clone()).or_insert_with(|| value.to_string());
        }
        rows.push(row);
    }

    Ok(ParsedCsv { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers_and_rows() {
        let text = "\u{feff}SKU,Name,Price\nANK-001,Anarkali Red,2500\n\nKRT-2,\"Kurti, blue\",900\n";
        let parsed = parse_csv(text).unwrap();

        assert_eq!(parsed.headers, vec!["SKU", "Name", "Price"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1]["Name"], "Kurti, blue");
        assert_eq!(parsed.rows[0]["SKU"], "ANK-001");
    }

    #[test]
    fn test_short_and_long_rows() {
        let parsed = parse_csv("sku,name,price\nA-1,Only name\nB-2,Two,300,extra\n").unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert!(!parsed.rows[0].contains_key("price"));
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn test_header_only_file() {
        let parsed = parse_csv("sku,name\n").unwrap();
        assert_eq!(parsed.headers.len(), 2);
        assert!(parsed.rows.is_empty());
    }
}
