use tracing::{debug, warn};

use crate::config::Locale;
use crate::consolidate::consolidate_top_n;
use crate::data::Table;
use crate::error::ChartError;
use crate::infer::{infer_value_kind, ValueKind};
use crate::ir::{
    AxisFormat, AxisTitles, ChartDescription, ChartKind, ChartLayout, ChartPoint, TextPosition,
};
use crate::mapping::{ChartSpec, RequestedKind};
use crate::palette::ColorPalette;
use crate::summarize::{count_categories, ensure_column, extract_measures, resolve_measure_column};

/// Build one chart. Never fails: every error becomes a placeholder chart.
pub fn build_chart(table: &Table, spec: &ChartSpec, locale: Locale) -> ChartDescription {
    let result = match &spec.kind {
        RequestedKind::Pie => build_pie(table, spec, locale),
        RequestedKind::Bar => build_bar(table, spec, locale),
        RequestedKind::Unknown(kind) => Err(ChartError::UnknownChartKind { kind: kind.clone() }),
    };

    match result {
        Ok(chart) => {
            debug!(column = %spec.column, kind = %spec.kind, points = chart.points.len(), "built chart");
            chart
        }
        Err(err) => {
            warn!(column = %spec.column, kind = %spec.kind, error = %err, "chart degraded to placeholder");
            placeholder(&err, locale)
        }
    }
}

/// Placeholder chart describing `err`
pub fn placeholder(err: &ChartError, locale: Locale) -> ChartDescription {
    ChartDescription::placeholder(locale.placeholder_title(err), err.to_string())
}

/// Pie: count categories, keep the top N, label each slice with its share
pub fn build_pie(table: &Table, spec: &ChartSpec, locale: Locale) -> Result<ChartDescription, ChartError> {
    let counts = count_categories(table, &spec.column, locale.missing_label())?;
    let consolidated = consolidate_top_n(counts, spec.top_n, locale.other_label());

    let total = consolidated.total();
    let fmt = locale.number_format();
    let assignment = ColorPalette::qualitative().assign_colors(&consolidated.labels());

    let points = consolidated
        .iter()
        .zip(assignment.colors)
        .map(|(entry, color)| {
            let share = if total > 0.0 { entry.measure / total * 100.0 } else { 0.0 };
            ChartPoint {
                label: entry.label.clone(),
                measure: entry.measure,
                color,
                text: format!("{} {}", entry.label, fmt.percent(share)),
                share: Some(share),
            }
        })
        .collect();

    Ok(ChartDescription {
        kind: ChartKind::Pie,
        title: spec.title.clone().unwrap_or_default(),
        points,
        category_order: assignment.order,
        value_kind: None,
        layout: ChartLayout {
            text_position: Some(TextPosition::Inside),
            show_legend: true,
            ..Default::default()
        },
        reason: None,
    })
}

/// Bar: one bar per row, sorted by value, top N kept, party colors applied
pub fn build_bar(table: &Table, spec: &ChartSpec, locale: Locale) -> Result<ChartDescription, ChartError> {
    ensure_column(table, &spec.column)?;
    let measure = resolve_measure_column(table, &spec.column, spec.measure.as_deref())?;
    let rows = extract_measures(table, &spec.column, &measure, locale.missing_label())?;

    // Classified on every row, before consolidation
    let value_kind = infer_value_kind(&measure, &rows.measures());

    let consolidated = consolidate_top_n(rows, spec.top_n, locale.other_label());
    let assignment = ColorPalette::party().assign_colors(&consolidated.labels());

    let fmt = locale.number_format();
    let points = consolidated
        .iter()
        .zip(assignment.colors)
        .map(|(entry, color)| ChartPoint {
            label: entry.label.clone(),
            measure: entry.measure,
            color,
            text: match value_kind {
                ValueKind::Percentage => fmt.percent(entry.measure),
                ValueKind::Count => fmt.grouped(entry.measure),
            },
            share: None,
        })
        .collect();

    let (value_axis, value_title) = match value_kind {
        ValueKind::Percentage => (AxisFormat::Percent { suffix: " %".to_string() }, locale.percent_axis_title()),
        ValueKind::Count => (AxisFormat::Grouped { separator: fmt.thousands }, locale.count_axis_title()),
    };

    Ok(ChartDescription {
        kind: ChartKind::Bar,
        title: spec.title.clone().unwrap_or_default(),
        points,
        category_order: assignment.order,
        value_kind: Some(value_kind),
        layout: ChartLayout {
            text_position: Some(TextPosition::Outside),
            show_legend: false,
            tick_angle: Some(-30),
            axis_titles: Some(AxisTitles {
                category: spec.column.clone(),
                value: value_title.to_string(),
            }),
            value_axis: Some(value_axis),
        },
        reason: None,
    })
}
