// Library exports for dashgraph

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod palette;
pub mod parser;

// Chart pipeline
pub mod ir;
pub mod summarize;
pub mod consolidate;
pub mod infer;
pub mod format;
pub mod builder;
pub mod mapping;
pub mod dispatch;
pub mod config;

pub use builder::build_chart;
pub use config::{DashboardConfig, Locale};
pub use data::{Cell, Table};
pub use dispatch::Dashboard;
pub use error::ChartError;
pub use ir::{ChartBatch, ChartDescription};
pub use mapping::{ChartSpec, MappingEntry};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
        }
    }
}
