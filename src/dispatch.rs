// Dashboard page: chart names -> mapping entries -> chart batch

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::builder::{build_chart, placeholder};
use crate::config::Locale;
use crate::data::Table;
use crate::error::ChartError;
use crate::ir::{ChartBatch, ChartDescription};
use crate::mapping::MappingEntry;

/// Source every entry without an explicit `source` reads from
pub const PRIMARY_SOURCE: &str = "kosis";

/// Ordered mapping from logical chart name to the entry that fills it
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub primary_source: String,
    pub charts: Vec<(String, MappingEntry)>,
}

impl Dashboard {
    pub fn new(primary_source: impl Into<String>, charts: Vec<(String, MappingEntry)>) -> Self {
        Self { primary_source: primary_source.into(), charts }
    }

    /// Add a chart, or replace the entry of an existing name in place
    pub fn with_chart(mut self, name: impl Into<String>, entry: MappingEntry) -> Self {
        let name = name.into();
        match self.charts.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = entry,
            None => self.charts.push((name, entry)),
        }
        self
    }

    /// The standard statistics page. Every panel is an untitled pie over the
    /// primary source, except the election results bar chart.
    pub fn default_page() -> Self {
        let pies = [
            ("family_pie", "einFamiliebestand"),
            ("religion_pie", "Religion"),
            ("migra_pie", "Religion"),
            ("migra_pie_country", "Religion"),
            ("private_households", "Religion"),
            ("apartments", "Religion"),
            ("sinusmilieus", "Religion"),
        ];

        let mut charts: Vec<(String, MappingEntry)> = pies
            .iter()
            .map(|(name, column)| (name.to_string(), MappingEntry::pie(*column)))
            .collect();
        charts.push((
            "latest_election".to_string(),
            MappingEntry::bar("Partei").with_source("elections"),
        ));

        Self::new(PRIMARY_SOURCE, charts)
    }

    /// Build every chart. Always yields exactly one description per name, in
    /// mapping order; failures become placeholders without affecting siblings.
    pub fn build(&self, sources: &HashMap<String, Table>, locale: Locale) -> ChartBatch {
        let mut batch = ChartBatch::new();
        for (name, entry) in &self.charts {
            batch.insert(name.clone(), self.build_one(name, entry, sources, locale));
        }
        debug!(charts = batch.len(), placeholders = batch.placeholder_count(), "built dashboard");
        batch
    }

    /// Build the chart for a single entry
    pub fn build_one(
        &self,
        name: &str,
        entry: &MappingEntry,
        sources: &HashMap<String, Table>,
        locale: Locale,
    ) -> ChartDescription {
        let spec = entry.canonicalize(&self.primary_source);
        match sources.get(&spec.source) {
            Some(table) => build_chart(table, &spec, locale),
            None => {
                warn!(chart = name, source = %spec.source, "source not loaded");
                placeholder(&ChartError::MissingSource { name: spec.source }, locale)
            }
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::default_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ChartKind;

    fn table(csv: &str) -> Table {
        Table::from_csv(crate::csv_reader::read_csv(csv.as_bytes()).unwrap())
    }

    fn sources(items: &[(&str, &str)]) -> HashMap<String, Table> {
        items.iter().map(|(name, csv)| (name.to_string(), table(csv))).collect()
    }

    #[test]
    fn test_shorthand_uses_primary_source() {
        let dashboard = Dashboard::new("kosis", vec![("religion".to_string(), MappingEntry::pie("Religion"))]);
        let batch = dashboard.build(&sources(&[("kosis", "Religion\nev\nrk\n")]), Locale::English);
        assert_eq!(batch.get("religion").unwrap().kind, ChartKind::Pie);
    }

    #[test]
    fn test_missing_source_is_isolated() {
        let dashboard = Dashboard::new(
            "kosis",
            vec![
                ("religion".to_string(), MappingEntry::pie("Religion")),
                ("election".to_string(), MappingEntry::bar("Partei").with_source("elections")),
            ],
        );
        let batch = dashboard.build(&sources(&[("kosis", "Religion\nev\n")]), Locale::English);

        assert_eq!(batch.names(), vec!["religion", "election"]);
        assert!(!batch.get("religion").unwrap().is_placeholder());
        let election = batch.get("election").unwrap();
        assert!(election.is_placeholder());
        assert_eq!(election.title, "No data available for elections");
    }

    #[test]
    fn test_missing_primary_source() {
        let dashboard = Dashboard::new("zensus", vec![("a".to_string(), MappingEntry::pie("x"))]);
        let batch = dashboard.build(&HashMap::new(), Locale::German);
        assert_eq!(batch.get("a").unwrap().title, "Keine Daten für zensus verfügbar");
    }

    #[test]
    fn test_default_page() {
        let page = Dashboard::default_page();
        assert_eq!(page.primary_source, "kosis");
        assert_eq!(page.charts.len(), 8);
        assert_eq!(page.charts[0].0, "family_pie");

        let (name, entry) = page.charts.last().unwrap();
        assert_eq!(name, "latest_election");
        let spec = entry.canonicalize(&page.primary_source);
        assert_eq!(spec.source, "elections");
        assert_eq!(spec.column, "Partei");
    }

    #[test]
    fn test_default_page_without_elections() {
        let batch = Dashboard::default_page().build(
            &sources(&[("kosis", "einFamiliebestand,Religion\nledig,ev\nverheiratet,rk\n")]),
            Locale::English,
        );
        assert_eq!(batch.len(), 8);
        assert_eq!(batch.placeholder_count(), 1);
        assert_eq!(batch.get("family_pie").unwrap().title, "");
        assert!(batch.get("latest_election").unwrap().is_placeholder());
    }

    #[test]
    fn test_with_chart_replaces_in_place() {
        let page = Dashboard::default_page().with_chart("family_pie", MappingEntry::pie("Familie"));
        assert_eq!(page.charts[0], ("family_pie".to_string(), MappingEntry::pie("Familie")));
        assert_eq!(page.charts.len(), 8);

        let page = page.with_chart("extra", MappingEntry::pie("Alter"));
        assert_eq!(page.charts.last().unwrap().0, "extra");
    }
}
