use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::infer::ValueKind;

// =============================================================================
// Phase 1: Aggregation
// =============================================================================

/// Whether an entry was observed in the data or synthesized by consolidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Observed,
    /// The merged "Other" bucket produced by top-N consolidation
    Remainder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub label: String,
    pub measure: f64,
    pub kind: EntryKind,
}

impl CategoryEntry {
    pub fn observed(label: impl Into<String>, measure: f64) -> Self {
        Self { label: label.into(), measure, kind: EntryKind::Observed }
    }

    pub fn remainder(label: impl Into<String>, measure: f64) -> Self {
        Self { label: label.into(), measure, kind: EntryKind::Remainder }
    }

    pub fn is_remainder(&self) -> bool {
        self.kind == EntryKind::Remainder
    }
}

/// Ordered label -> measure table. Summarized mappings have unique labels and
/// descending measures; a consolidated mapping ends with its remainder entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryMapping {
    pub entries: Vec<CategoryEntry>,
}

impl CategoryMapping {
    pub fn new(entries: Vec<CategoryEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryEntry> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    pub fn measures(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.measure).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.measure).sum()
    }

    /// Measure of the first entry carrying `label`
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.measure)
    }

    pub fn remainder(&self) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.is_remainder())
    }
}

impl FromIterator<(String, f64)> for CategoryMapping {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(l, m)| CategoryEntry::observed(l, m)).collect())
    }
}

impl<'a> IntoIterator for &'a CategoryMapping {
    type Item = &'a CategoryEntry;
    type IntoIter = std::slice::Iter<'a, CategoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// Phase 2: Chart Description
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Bar,
    /// "No data available" placeholder
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    Inside,
    Outside,
}

/// Value-axis tick format
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AxisFormat {
    Percent { suffix: String },
    Grouped { separator: char },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitles {
    pub category: String,
    pub value: String,
}

/// Presentation hints for the renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartLayout {
    pub text_position: Option<TextPosition>,
    pub show_legend: bool,
    pub tick_angle: Option<i32>,
    pub axis_titles: Option<AxisTitles>,
    pub value_axis: Option<AxisFormat>,
}

/// One slice or bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub measure: f64,
    pub color: String,
    /// Formatted data label
    pub text: String,
    /// Percentage of the total (pie only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<f64>,
}

/// Renderer-agnostic description of one chart.
///
/// `category_order` always lists the point labels in point order; renderers
/// must use it instead of sorting labels themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescription {
    pub kind: ChartKind,
    pub title: String,
    pub points: Vec<ChartPoint>,
    pub category_order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    pub layout: ChartLayout,
    /// Why the chart degraded to a placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ChartDescription {
    /// An empty "no data" chart carrying a user-visible title
    pub fn placeholder(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: ChartKind::Empty,
            title: title.into(),
            points: Vec::new(),
            category_order: Vec::new(),
            value_kind: None,
            layout: ChartLayout::default(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == ChartKind::Empty
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn measures(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.measure).collect()
    }

    pub fn colors(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.color.as_str()).collect()
    }

    pub fn point(&self, label: &str) -> Option<&ChartPoint> {
        self.points.iter().find(|p| p.label == label)
    }
}

// =============================================================================
// Phase 3: Page batch
// =============================================================================

/// Chart descriptions keyed by logical chart name, in dashboard order.
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartBatch {
    charts: Vec<(String, ChartDescription)>,
}

impl ChartBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the chart for `name`; a replaced chart keeps its position
    pub fn insert(&mut self, name: impl Into<String>, chart: ChartDescription) {
        let name = name.into();
        match self.charts.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = chart,
            None => self.charts.push((name, chart)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ChartDescription> {
        self.charts.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn names(&self) -> Vec<&str> {
        self.charts.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChartDescription)> {
        self.charts.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.charts.iter().filter(|(_, c)| c.is_placeholder()).count()
    }
}

impl Serialize for ChartBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.charts.len()))?;
        for (name, chart) in &self.charts {
            map.serialize_entry(name, chart)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_from_pairs() {
        let mapping: CategoryMapping =
            vec![("a".to_string(), 2.0), ("b".to_string(), 1.0)].into_iter().collect();
        assert_eq!(mapping.labels(), vec!["a", "b"]);
        assert_eq!(mapping.total(), 3.0);
        assert_eq!(mapping.get("b"), Some(1.0));
        assert!(mapping.remainder().is_none());
    }

    #[test]
    fn test_placeholder() {
        let chart = ChartDescription::placeholder("No data available for x", "column 'x' not found");
        assert!(chart.is_placeholder());
        assert!(chart.points.is_empty());
        assert_eq!(chart.reason.as_deref(), Some("column 'x' not found"));
    }

    #[test]
    fn test_batch_keeps_order() {
        let mut batch = ChartBatch::new();
        batch.insert("b", ChartDescription::placeholder("B", "r"));
        batch.insert("a", ChartDescription::placeholder("A", "r"));
        batch.insert("b", ChartDescription::placeholder("B2", "r"));
        assert_eq!(batch.names(), vec!["b", "a"]);
        assert_eq!(batch.get("b").unwrap().title, "B2");

        let json = serde_json::to_string(&batch).unwrap();
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn test_placeholder_serialization() {
        let chart = ChartDescription::placeholder("T", "why");
        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["kind"], "empty");
        assert_eq!(value["reason"], "why");
        assert!(value.get("value_kind").is_none());
    }
}
