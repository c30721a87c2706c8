// Column reduction: category counts and per-row measures

use std::collections::HashMap;

use crate::data::{Cell, Table};
use crate::error::ChartError;
use crate::ir::{CategoryEntry, CategoryMapping};

/// Measure columns tried, in order, when a bar chart names none
pub const MEASURE_CANDIDATES: &[&str] = &["Stimmen_Prozent", "Stimmen", "Prozent", "Votes", "Anzahl"];

/// Fail unless `column` exists and the table has at least one row
pub fn ensure_column(table: &Table, column: &str) -> Result<(), ChartError> {
    if !table.has_column(column) {
        return Err(ChartError::MissingColumn { column: column.to_string() });
    }
    if table.is_empty() {
        return Err(ChartError::EmptyTable { column: column.to_string() });
    }
    Ok(())
}

/// Count occurrences of each label in `column`.
///
/// Missing cells are counted under `missing_label`. The result is sorted by
/// descending count; equal counts keep the order of first appearance.
pub fn count_categories(
    table: &Table,
    column: &str,
    missing_label: &str,
) -> Result<CategoryMapping, ChartError> {
    ensure_column(table, column)?;
    let cells = table
        .column(column)
        .ok_or_else(|| ChartError::MissingColumn { column: column.to_string() })?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for cell in cells {
        let label = category_label(cell, missing_label);
        match counts.get_mut(&label) {
            Some(count) => *count += 1,
            None => {
                counts.insert(label.clone(), 1);
                order.push(label);
            }
        }
    }

    let mut entries: Vec<CategoryEntry> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            CategoryEntry::observed(label, count as f64)
        })
        .collect();
    sort_descending(&mut entries);

    Ok(CategoryMapping::new(entries))
}

/// Pick the measure column for a bar chart.
///
/// An explicit request must exist. Otherwise the first present
/// [`MEASURE_CANDIDATES`] entry wins, then the first numeric column that is
/// not the category column.
pub fn resolve_measure_column(
    table: &Table,
    category: &str,
    requested: Option<&str>,
) -> Result<String, ChartError> {
    if let Some(name) = requested {
        return if table.has_column(name) {
            Ok(name.to_string())
        } else {
            Err(ChartError::NoSuitableMeasureColumn { requested: Some(name.to_string()) })
        };
    }

    if let Some(found) = MEASURE_CANDIDATES.iter().find(|c| table.has_column(c)) {
        return Ok(found.to_string());
    }

    table
        .headers
        .iter()
        .find(|h| h.as_str() != category && table.is_numeric_column(h))
        .cloned()
        .ok_or(ChartError::NoSuitableMeasureColumn { requested: None })
}

/// One entry per row: category label and its measure, sorted by descending
/// measure (stable). Non-numeric or missing measures count as zero.
pub fn extract_measures(
    table: &Table,
    category: &str,
    measure: &str,
    missing_label: &str,
) -> Result<CategoryMapping, ChartError> {
    ensure_column(table, category)?;
    let cat_idx = table
        .column_index(category)
        .ok_or_else(|| ChartError::MissingColumn { column: category.to_string() })?;
    let val_idx = table
        .column_index(measure)
        .ok_or_else(|| ChartError::NoSuitableMeasureColumn { requested: Some(measure.to_string()) })?;

    let mut entries: Vec<CategoryEntry> = table
        .rows
        .iter()
        .map(|row| {
            let label = category_label(&row[cat_idx], missing_label);
            let value = row[val_idx].as_number().unwrap_or(0.0);
            CategoryEntry::observed(label, value)
        })
        .collect();
    sort_descending(&mut entries);

    Ok(CategoryMapping::new(entries))
}

fn category_label(cell: &Cell, missing_label: &str) -> String {
    cell.label().unwrap_or_else(|| missing_label.to_string())
}

/// Stable sort by descending measure
pub(crate) fn sort_descending(entries: &mut [CategoryEntry]) {
    entries.sort_by(|a, b| b.measure.total_cmp(&a.measure));
}
