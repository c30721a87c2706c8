use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::data::Table;
use crate::dispatch::{Dashboard, PRIMARY_SOURCE};
use crate::error::ChartError;
use crate::format::NumberFormat;
use crate::mapping::MappingEntry;
use crate::RenderOptions;

/// Language of every user-visible word the builder emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
    #[serde(rename = "de")]
    #[value(name = "de")]
    German,
}

impl Locale {
    /// Label of the merged top-N remainder
    pub fn other_label(self) -> &'static str {
        match self {
            Locale::English => "Other",
            Locale::German => "Andere",
        }
    }

    /// Category label for missing cells
    pub fn missing_label(self) -> &'static str {
        match self {
            Locale::English => "no data specified",
            Locale::German => "keine Angabe",
        }
    }

    pub fn number_format(self) -> NumberFormat {
        match self {
            Locale::English => NumberFormat::english(),
            Locale::German => NumberFormat::german(),
        }
    }

    pub fn percent_axis_title(self) -> &'static str {
        match self {
            Locale::English => "Percent",
            Locale::German => "Prozent",
        }
    }

    pub fn count_axis_title(self) -> &'static str {
        match self {
            Locale::English => "Count",
            Locale::German => "Anzahl",
        }
    }

    /// Title of the placeholder chart shown instead of a failed one
    pub fn placeholder_title(self, error: &ChartError) -> String {
        match (self, error) {
            (Locale::English, ChartError::MissingColumn { column } | ChartError::EmptyTable { column }) => {
                format!("No data available for {}", column)
            }
            (Locale::German, ChartError::MissingColumn { column } | ChartError::EmptyTable { column }) => {
                format!("Keine Daten für {} verfügbar", column)
            }
            (Locale::English, ChartError::MissingSource { name }) => format!("No data available for {}", name),
            (Locale::German, ChartError::MissingSource { name }) => format!("Keine Daten für {} verfügbar", name),
            (Locale::English, ChartError::NoSuitableMeasureColumn { .. }) => "No suitable value column found".to_string(),
            (Locale::German, ChartError::NoSuitableMeasureColumn { .. }) => "Keine geeignete Wertespalte gefunden".to_string(),
            (Locale::English, ChartError::UnknownChartKind { kind }) => format!("Unknown chart kind '{}'", kind),
            (Locale::German, ChartError::UnknownChartKind { kind }) => format!("Unbekannter Diagrammtyp '{}'", kind),
        }
    }
}

/// Dashboard configuration file (JSON)
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_primary_source")]
    pub primary_source: String,
    #[serde(default)]
    pub locale: Locale,
    /// Source name -> CSV path, relative paths resolved against the config file
    #[serde(default)]
    pub sources: HashMap<String, PathBuf>,
    /// Logical chart name -> mapping entry, in file order
    #[serde(default, deserialize_with = "ordered_charts")]
    pub charts: Option<Vec<(String, MappingEntry)>>,
    #[serde(default)]
    pub render: RenderOptions,
}

fn default_primary_source() -> String {
    PRIMARY_SOURCE.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            primary_source: default_primary_source(),
            locale: Locale::default(),
            sources: HashMap::new(),
            charts: None,
            render: RenderOptions::default(),
        }
    }
}

/// Deserialize a JSON object into (key, entry) pairs without losing key order
fn ordered_charts<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<(String, MappingEntry)>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Map<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    raw.map(|map| {
        map.into_iter()
            .map(|(name, value)| {
                serde_json::from_value::<MappingEntry>(value)
                    .map(|entry| (name.clone(), entry))
                    .map_err(|e| serde::de::Error::custom(format!("chart '{}': {}", name, e)))
            })
            .collect()
    })
    .transpose()
}

impl DashboardConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse dashboard configuration")
    }

    /// Load a configuration file; relative source paths become relative to its directory
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration '{}'", path.display()))?;
        let mut config = Self::from_json_str(&text)
            .with_context(|| format!("Invalid configuration in '{}'", path.display()))?;

        if let Some(base) = path.parent() {
            for source_path in config.sources.values_mut() {
                if source_path.is_relative() {
                    *source_path = base.join(&*source_path);
                }
            }
        }
        Ok(config)
    }

    /// The dashboard this configuration describes; the built-in page when no charts are listed
    pub fn dashboard(&self) -> Dashboard {
        match &self.charts {
            Some(charts) => Dashboard::new(self.primary_source.clone(), charts.clone()),
            None => {
                let mut page = Dashboard::default_page();
                page.primary_source = self.primary_source.clone();
                page
            }
        }
    }

    /// Read every configured source table from disk. A source that fails to
    /// load is logged and left out, so its charts become placeholders.
    pub fn load_sources(&self) -> HashMap<String, Table> {
        let mut tables = HashMap::new();
        for (name, path) in &self.sources {
            match load_table(path) {
                Ok(table) => {
                    tables.insert(name.clone(), table);
                }
                Err(err) => warn!(
                    source = %name,
                    path = %path.display(),
                    error = %format!("{:#}", err),
                    "skipping source"
                ),
            }
        }
        tables
    }
}

/// Load one source table: `.json` files hold an array of objects, anything else is CSV
pub fn load_table(path: &Path) -> Result<Table> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in '{}'", path.display()))?;
        Table::from_json(&value)
    } else {
        Ok(Table::from_csv(crate::csv_reader::read_csv_from_path(path)?))
    }
}
