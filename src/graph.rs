use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::format::NumberFormat;
use crate::ir::{AxisFormat, ChartDescription, ChartKind};
use crate::{OutputFormat, RenderOptions};

/// Same grey as the palette default
const FALLBACK_COLOR: RGBColor = RGBColor(0x88, 0x88, 0x88);
const TEXT_GREY: RGBColor = RGBColor(0x44, 0x44, 0x44);

/// Render a chart description to image bytes (PNG or SVG text)
pub fn render_chart(chart: &ChartDescription, options: &RenderOptions) -> Result<Vec<u8>> {
    if options.width == 0 || options.height == 0 {
        anyhow::bail!("Cannot render a {}x{} image", options.width, options.height);
    }
    match options.format {
        OutputFormat::Png => render_png(chart, options.width, options.height),
        OutputFormat::Svg => render_svg(chart, options.width, options.height).map(String::into_bytes),
    }
}

fn render_png(chart: &ChartDescription, width: u32, height: u32) -> Result<Vec<u8>> {
    let len = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(3))
        .with_context(|| format!("Image size {}x{} is too large", width, height))?;
    let mut buffer = vec![0u8; len as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn render_svg(chart: &ChartDescription, width: u32, height: u32) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, chart: &ChartDescription) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    match chart.kind {
        ChartKind::Bar if !chart.points.is_empty() => draw_bar(root, chart),
        ChartKind::Pie if !chart.points.is_empty() => draw_pie(root, chart),
        _ => draw_placeholder(root, chart),
    }
}

/// Bars in `category_order`, one color each, value text on top
fn draw_bar<DB>(root: &DrawingArea<DB, Shift>, chart: &ChartDescription) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let count = chart.points.len();
    let y_max = chart.points.iter().map(|p| p.measure).fold(0.0, f64::max);
    // Headroom for the value texts
    let y_top = if y_max > 0.0 { y_max * 1.15 } else { 1.0 };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(10)
        .caption(&chart.title, ("sans-serif", 20))
        .x_label_area_size(60)
        .y_label_area_size(70);
    let mut cc = builder
        .build_cartesian_2d((0..count).into_segmented(), 0.0..y_top)
        .context("Failed to build chart")?;

    let order = &chart.category_order;
    let x_formatter = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(idx) => order.get(*idx).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let value_axis = chart.layout.value_axis.clone();
    let y_formatter = |y: &f64| format_tick(*y, value_axis.as_ref());

    let (x_desc, y_desc) = match &chart.layout.axis_titles {
        Some(titles) => (titles.category.clone(), titles.value.clone()),
        None => (String::new(), String::new()),
    };

    cc.configure_mesh()
        .disable_x_mesh()
        .x_labels(count)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .context("Failed to draw mesh")?;

    cc.draw_series(chart.points.iter().enumerate().map(|(idx, point)| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(idx), 0.0), (SegmentValue::Exact(idx + 1), point.measure)],
            parse_hex_color(&point.color).unwrap_or(FALLBACK_COLOR).filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))
    .context("Failed to draw bars")?;

    let label_style = TextStyle::from(("sans-serif", 12).into_font())
        .color(&TEXT_GREY)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    cc.draw_series(chart.points.iter().enumerate().map(|(idx, point)| {
        Text::new(point.text.clone(), (SegmentValue::CenterOf(idx), point.measure), label_style.clone())
    }))
    .context("Failed to draw bar labels")?;

    Ok(())
}

/// Slices clockwise from 12 o'clock, labels inside, optional legend on the right
fn draw_pie<DB>(root: &DrawingArea<DB, Shift>, chart: &ChartDescription) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root
        .titled(&chart.title, ("sans-serif", 20))
        .context("Failed to draw title")?;
    let (width, _) = area.dim_in_pixel();

    let (pie_area, legend_area) = if chart.layout.show_legend {
        let (left, right) = area.split_horizontally((width as i32) * 2 / 3);
        (left, Some(right))
    } else {
        (area, None)
    };

    let (pie_w, pie_h) = pie_area.dim_in_pixel();
    let center = ((pie_w / 2) as i32, (pie_h / 2) as i32);
    let radius = (pie_w.min(pie_h) as f64 / 2.0 - 20.0).max(10.0);

    let total: f64 = chart.points.iter().map(|p| p.measure).sum();
    let label_style = TextStyle::from(("sans-serif", 12).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut start_angle = -90.0;
    for point in &chart.points {
        let fraction = if total > 0.0 { point.measure / total } else { 0.0 };
        let sweep_angle = fraction * 360.0;
        if sweep_angle <= 0.0 {
            continue;
        }

        let color = parse_hex_color(&point.color).unwrap_or(FALLBACK_COLOR);
        pie_area
            .draw(&Polygon::new(slice_points(center, radius, start_angle, sweep_angle), color.filled()))
            .context("Failed to draw slice")?;

        let mid = (start_angle + sweep_angle / 2.0).to_radians();
        let anchor = (
            center.0 + (radius * 0.65 * mid.cos()) as i32,
            center.1 + (radius * 0.65 * mid.sin()) as i32,
        );
        pie_area
            .draw_text(&point.text, &label_style, anchor)
            .context("Failed to draw slice label")?;

        start_angle += sweep_angle;
    }

    if let Some(legend) = legend_area {
        let (_, legend_h) = legend.dim_in_pixel();
        let entry_height = 25;
        let top = ((legend_h as i32) - entry_height * chart.points.len() as i32).max(0) / 2;
        let text_style = TextStyle::from(("sans-serif", 14).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        for (i, point) in chart.points.iter().enumerate() {
            let y = top + (i as i32) * entry_height;
            let color = parse_hex_color(&point.color).unwrap_or(FALLBACK_COLOR);
            legend
                .draw(&Rectangle::new([(10, y), (26, y + 16)], color.filled()))
                .context("Failed to draw legend")?;
            legend
                .draw_text(&point.label, &text_style, (34, y + 8))
                .context("Failed to draw legend")?;
        }
    }

    Ok(())
}

fn draw_placeholder<DB>(root: &DrawingArea<DB, Shift>, chart: &ChartDescription) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (width, height) = root.dim_in_pixel();
    let style = TextStyle::from(("sans-serif", 20).into_font())
        .color(&TEXT_GREY)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw_text(&chart.title, &style, ((width / 2) as i32, (height / 2) as i32))
        .context("Failed to draw placeholder")?;
    Ok(())
}

/// Outline of one slice: the center followed by points along the arc
fn slice_points(center: (i32, i32), radius: f64, start_angle: f64, sweep_angle: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep_angle / 2.0).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        let rad = (start_angle + sweep_angle * i as f64 / steps as f64).to_radians();
        points.push((
            center.0 + (radius * rad.cos()) as i32,
            center.1 + (radius * rad.sin()) as i32,
        ));
    }
    points
}

fn format_tick(value: f64, axis: Option<&AxisFormat>) -> String {
    match axis {
        Some(AxisFormat::Percent { suffix }) => format!("{:.0}{}", value, suffix),
        Some(AxisFormat::Grouped { separator }) => {
            let decimal = if *separator == '.' { ',' } else { '.' };
            NumberFormat { thousands: *separator, decimal }.grouped(value.round())
        }
        None => format!("{}", value),
    }
}

/// Parse `#RRGGBB` (or `RRGGBB`)
pub fn parse_hex_color(color: &str) -> Option<RGBColor> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
