use anyhow::{anyhow, Result};
use serde_json::Value;
use std::fmt;

/// Markers that loaders commonly write for an empty cell
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    /// Classify a raw string field (CSV) into a typed cell
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Label used when the cell acts as a category. `None` for missing cells.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(number_label(*n)),
            Cell::Missing => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => f.write_str(&number_label(*n)),
            Cell::Missing => Ok(()),
        }
    }
}

fn number_label(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// An in-memory table: named columns over rows of typed cells.
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from typed rows, padding or truncating each row to the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Create a Table from raw string records (CSV)
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let rows = records
            .iter()
            .map(|record| record.iter().map(|field| Cell::parse(field)).collect())
            .collect();
        Self::new(headers, rows)
    }

    /// Create a Table from an existing CsvData struct
    pub fn from_csv(csv: crate::csv_reader::CsvData) -> Self {
        Self::from_records(csv.headers, csv.rows)
    }

    /// Create a Table from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let Some(first) = array.first() else {
            return Ok(Self::default());
        };

        // Headers come from the first object
        let first_obj = first
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => Cell::Text(s.clone()),
                    Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
                    Some(Value::Bool(b)) => Cell::Text(b.to_string()),
                    Some(Value::Null) | None => Cell::Missing,
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Iterate over the cells of one column, or `None` if the column is absent
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// A column is numeric when every non-missing cell holds a number
    pub fn is_numeric_column(&self, name: &str) -> bool {
        match self.column(name) {
            Some(mut cells) => cells.all(|c| matches!(c, Cell::Number(_) | Cell::Missing)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("42"), Cell::Number(42.0));
        assert_eq!(Cell::parse(" 3.5 "), Cell::Number(3.5));
        assert_eq!(Cell::parse("SPD"), Cell::Text("SPD".to_string()));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("NA"), Cell::Missing);
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".to_string()));
    }

    #[test]
    fn test_number_labels() {
        assert_eq!(Cell::Number(3.0).label(), Some("3".to_string()));
        assert_eq!(Cell::Number(2.5).label(), Some("2.5".to_string()));
        assert_eq!(Cell::Missing.label(), None);
    }

    #[test]
    fn test_from_records_pads_short_rows() {
        let table = Table::from_records(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["x".to_string()], vec!["y".to_string(), "2".to_string(), "extra".to_string()]],
        );
        assert_eq!(table.rows[0], vec![Cell::Text("x".to_string()), Cell::Missing]);
        assert_eq!(table.rows[1], vec![Cell::Text("y".to_string()), Cell::Number(2.0)]);
    }

    #[test]
    fn test_numeric_column() {
        let table = Table::from_records(
            vec!["name".to_string(), "n".to_string(), "empty".to_string()],
            vec![
                vec!["a".to_string(), "1".to_string(), "".to_string()],
                vec!["b".to_string(), "".to_string(), "".to_string()],
            ],
        );
        assert!(!table.is_numeric_column("name"));
        assert!(table.is_numeric_column("n"));
        assert!(table.is_numeric_column("empty"));
        assert!(!table.is_numeric_column("absent"));
    }

    #[test]
    fn test_from_json() {
        let value = json!([
            {"Partei": "SPD", "Stimmen": 25},
            {"Partei": null, "Stimmen": 3.5}
        ]);
        let table = Table::from_json(&value).unwrap();
        assert_eq!(table.headers, vec!["Partei", "Stimmen"]);
        assert_eq!(table.rows[1][0], Cell::Missing);
        assert_eq!(table.rows[1][1], Cell::Number(3.5));
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let value = json!([{"a": [1, 2]}]);
        assert!(Table::from_json(&value).is_err());
    }

    #[test]
    fn test_from_json_empty_array() {
        let table = Table::from_json(&json!([])).unwrap();
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }
}
