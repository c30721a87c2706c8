use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dashgraph::csv_reader;
use dashgraph::graph;
use dashgraph::parser::parse_named_entry;
use dashgraph::{ChartBatch, DashboardConfig, Locale, OutputFormat, RenderOptions, Table};

#[derive(Parser, Debug)]
#[command(name = "dashgraph")]
#[command(about = "Build dashboard chart descriptions from CSV tables", long_about = None)]
struct Args {
    /// Dashboard configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source table as <name>=<path.csv> (repeatable). Without any source, CSV is read from stdin.
    #[arg(long = "source", value_name = "NAME=PATH")]
    sources: Vec<String>,

    /// Chart as <name>=<entry>, e.g. 'wahl=bar(column: Partei, top: 5)' (repeatable)
    #[arg(long = "chart", value_name = "NAME=ENTRY")]
    charts: Vec<String>,

    /// Source used by entries that name none
    #[arg(long)]
    primary: Option<String>,

    #[arg(long, value_enum)]
    locale: Option<Locale>,

    /// Also write one preview image per chart into this directory
    #[arg(long)]
    render_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    apply_overrides(&mut config, &args)?;

    let mut tables = config.load_sources();
    if config.sources.is_empty() {
        let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
        debug!(source = %config.primary_source, "read primary source from stdin");
        tables.insert(config.primary_source.clone(), Table::from_csv(csv_data));
    }

    let mut dashboard = config.dashboard();
    if config.charts.is_none() && !args.charts.is_empty() {
        // Command-line charts replace the built-in page
        dashboard.charts.clear();
    }
    for raw in &args.charts {
        let (name, entry) = parse_named_entry(raw)?;
        dashboard = dashboard.with_chart(name, entry);
    }

    let batch = dashboard.build(&tables, config.locale);
    info!(charts = batch.len(), placeholders = batch.placeholder_count(), "dashboard built");

    if let Some(dir) = &args.render_dir {
        write_previews(&batch, dir, &config.render)?;
    }

    let json = serde_json::to_string_pretty(&batch).context("Failed to serialize charts")?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write charts to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn apply_overrides(config: &mut DashboardConfig, args: &Args) -> Result<()> {
    if let Some(primary) = &args.primary {
        config.primary_source = primary.clone();
    }
    if let Some(locale) = args.locale {
        config.locale = locale;
    }
    if let Some(format) = args.format {
        config.render.format = format;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    for raw in &args.sources {
        let (name, path) = raw
            .split_once('=')
            .with_context(|| format!("Expected <name>=<path>, got '{}'", raw))?;
        config.sources.insert(name.trim().to_string(), PathBuf::from(path.trim()));
    }
    Ok(())
}

fn write_previews(batch: &ChartBatch, dir: &Path, options: &RenderOptions) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create '{}'", dir.display()))?;

    for (name, chart) in batch.iter() {
        let bytes = graph::render_chart(chart, options)
            .with_context(|| format!("Failed to render chart '{}'", name))?;
        let file_name = format!("{}.{}", name.replace(['/', '\\'], "_"), options.format.extension());
        let path = dir.join(file_name);
        std::fs::write(&path, bytes).with_context(|| format!("Failed to write '{}'", path.display()))?;
        debug!(chart = name, path = %path.display(), "wrote preview");
    }
    Ok(())
}
