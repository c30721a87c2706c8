use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Slices kept before the rest is merged, for pie charts
pub const DEFAULT_PIE_TOP_N: usize = 8;
/// Bars kept before the rest is merged, for bar charts
pub const DEFAULT_BAR_TOP_N: usize = 12;

/// How one dashboard panel gets its data: either just a column name (a pie
/// chart with defaults) or a structured entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MappingEntry {
    Shorthand(String),
    Structured(StructuredEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StructuredEntry {
    /// `pie` or `bar`; anything else renders as an "unknown kind" placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub column: String,
    #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
    pub measure: Option<String>,
    #[serde(default, alias = "top", skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedKind {
    Pie,
    Bar,
    Unknown(String),
}

impl RequestedKind {
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "pie" => RequestedKind::Pie,
            "bar" => RequestedKind::Bar,
            _ => RequestedKind::Unknown(kind.to_string()),
        }
    }
}

impl fmt::Display for RequestedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedKind::Pie => f.write_str("pie"),
            RequestedKind::Bar => f.write_str("bar"),
            RequestedKind::Unknown(kind) => f.write_str(kind),
        }
    }
}

/// Canonical form every entry is resolved to before building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: RequestedKind,
    pub column: String,
    pub measure: Option<String>,
    pub top_n: usize,
    pub title: Option<String>,
    pub source: String,
}

impl MappingEntry {
    pub fn pie(column: impl Into<String>) -> Self {
        MappingEntry::Shorthand(column.into())
    }

    pub fn bar(column: impl Into<String>) -> Self {
        MappingEntry::Structured(StructuredEntry {
            kind: Some("bar".to_string()),
            column: column.into(),
            ..Default::default()
        })
    }

    /// Builder-style source override; a shorthand becomes a structured pie entry
    pub fn with_source(self, source: impl Into<String>) -> Self {
        let mut entry = self.into_structured();
        entry.source = Some(source.into());
        MappingEntry::Structured(entry)
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        let mut entry = self.into_structured();
        entry.title = Some(title.into());
        MappingEntry::Structured(entry)
    }

    pub fn with_top_n(self, top_n: usize) -> Self {
        let mut entry = self.into_structured();
        entry.top_n = Some(top_n);
        MappingEntry::Structured(entry)
    }

    fn into_structured(self) -> StructuredEntry {
        match self {
            MappingEntry::Shorthand(column) => StructuredEntry { column, ..Default::default() },
            MappingEntry::Structured(entry) => entry,
        }
    }

    /// Resolve defaults: kind `pie`, top-N by kind (at least 1), `primary_source`
    pub fn canonicalize(&self, primary_source: &str) -> ChartSpec {
        match self {
            MappingEntry::Shorthand(column) => ChartSpec {
                kind: RequestedKind::Pie,
                column: column.clone(),
                measure: None,
                top_n: DEFAULT_PIE_TOP_N,
                title: None,
                source: primary_source.to_string(),
            },
            MappingEntry::Structured(entry) => {
                let kind = entry.kind.as_deref().map(RequestedKind::parse).unwrap_or(RequestedKind::Pie);
                let default_top_n = match kind {
                    RequestedKind::Bar => DEFAULT_BAR_TOP_N,
                    _ => DEFAULT_PIE_TOP_N,
                };
                ChartSpec {
                    kind,
                    column: entry.column.clone(),
                    measure: entry.measure.clone(),
                    top_n: entry.top_n.unwrap_or(default_top_n).max(1),
                    title: entry.title.clone(),
                    source: entry.source.clone().unwrap_or_else(|| primary_source.to_string()),
                }
            }
        }
    }
}

impl FromStr for MappingEntry {
    type Err = anyhow::Error;

    /// Parse the mapping-entry DSL, e.g. `Religion` or `bar(column: Partei, top: 5)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_mapping_entry(s)
    }
}
