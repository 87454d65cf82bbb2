//! Rasterising a [`ChartSet`] into a 2x2 grid bitmap
//!
//! Shapes are drawn with [`plotters`] into an in-memory RGB buffer. Text is
//! not drawn into the bitmap; every title, tick and legend entry is returned
//! as a [`TextLabel`] positioned in bitmap pixels so the document layer can
//! set it with its own fonts.

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::charts::{
    Chart, ChartSet, GroupedBarChart, HistogramChart, PieChart, Rgb, ScatterChart,
};

/// Bitmap size of the full grid
pub const GRID_WIDTH: u32 = 1600;
pub const GRID_HEIGHT: u32 = 1200;

const TITLE_SIZE: f64 = 30.0;
const AXIS_SIZE: f64 = 22.0;
const TICK_SIZE: f64 = 18.0;
const LEGEND_SIZE: f64 = 20.0;
const MESSAGE_SIZE: f64 = 26.0;

/// Rough Helvetica advance width as a fraction of the font size
const CHAR_WIDTH: f64 = 0.55;

const MARGIN_TOP: i32 = 90;
const MARGIN_BOTTOM: i32 = 80;
const MARGIN_LEFT: i32 = 100;
const MARGIN_RIGHT: i32 = 30;
const Y_TICKS: usize = 5;

/// Errors that can occur while rasterising charts
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, RenderError>;

fn drawing<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Text to overlay on the bitmap; `x`/`y` are the baseline anchor in
/// bitmap pixels, `size` is the font size in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub size: f64,
    pub anchor: Anchor,
}

impl TextLabel {
    fn new(x: f64, y: f64, text: impl Into<String>, size: f64, anchor: Anchor) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            size,
            anchor,
        }
    }

    /// Estimated rendered width in pixels
    pub fn approx_width(&self) -> f64 {
        self.text.chars().count() as f64 * self.size * CHAR_WIDTH
    }

    /// Left edge after applying the anchor
    pub fn left(&self) -> f64 {
        match self.anchor {
            Anchor::Start => self.x,
            Anchor::Middle => self.x - self.approx_width() / 2.0,
            Anchor::End => self.x - self.approx_width(),
        }
    }
}

/// RGB pixels of the chart grid plus the text to place over them
#[derive(Debug, Clone)]
pub struct RenderedGrid {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB, three bytes per pixel
    pub pixels: Vec<u8>,
    pub labels: Vec<TextLabel>,
}

/// Draw the four charts of `charts` into one bitmap, row by row.
pub fn render_grid(charts: &ChartSet) -> Result<RenderedGrid> {
    let mut pixels = vec![0u8; (GRID_WIDTH * GRID_HEIGHT * 3) as usize];
    let mut labels = Vec::new();

    {
        let root = BitMapBackend::with_buffer(pixels.as_mut_slice(), (GRID_WIDTH, GRID_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::DrawingArea(e.to_string()))?;

        let cells = root.split_evenly((2, 2));
        if cells.len() != 4 {
            return Err(RenderError::DrawingArea(format!(
                "expected 4 grid cells, got {}",
                cells.len()
            )));
        }

        draw_cell(&cells[0], &charts.type_distribution, &mut labels, draw_pie)?;
        draw_cell(&cells[1], &charts.type_averages, &mut labels, draw_grouped_bar)?;
        draw_cell(&cells[2], &charts.flowrate_pressure, &mut labels, draw_scatter)?;
        draw_cell(&cells[3], &charts.temperature_histogram, &mut labels, draw_histogram)?;

        root.present()
            .map_err(|e| RenderError::DrawingArea(e.to_string()))?;
    }

    tracing::debug!(labels = labels.len(), "Rendered chart grid");

    Ok(RenderedGrid {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
        pixels,
        labels,
    })
}

/// Signature shared by the per-chart drawing functions
type DrawFn<DB, T> = fn(&DrawingArea<DB, Shift>, &T, &mut Vec<TextLabel>) -> Result<()>;

fn draw_cell<DB: DrawingBackend, T>(
    area: &DrawingArea<DB, Shift>,
    chart: &Chart<T>,
    labels: &mut Vec<TextLabel>,
    draw: DrawFn<DB, T>,
) -> Result<()> {
    match chart {
        Chart::Ready(spec) => draw(area, spec, labels),
        Chart::Placeholder { message } => draw_placeholder(area, message, labels),
    }
}

fn to_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn base(area: &DrawingArea<impl DrawingBackend, Shift>) -> (f64, f64) {
    let (x, y) = area.get_base_pixel();
    (x as f64, y as f64)
}

fn draw_placeholder<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    message: &str,
    labels: &mut Vec<TextLabel>,
) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    area.draw(&Rectangle::new(
        [(20, 20), (w - 20, h - 20)],
        RGBColor(200, 200, 200).stroke_width(2),
    ))
    .map_err(drawing)?;

    let (bx, by) = base(area);
    labels.push(TextLabel::new(
        bx + w as f64 / 2.0,
        by + h as f64 / 2.0,
        message,
        MESSAGE_SIZE,
        Anchor::Middle,
    ));
    Ok(())
}

fn push_title(area: &DrawingArea<impl DrawingBackend, Shift>, title: &str, labels: &mut Vec<TextLabel>) {
    let (bx, by) = base(area);
    let (w, _) = area.dim_in_pixel();
    labels.push(TextLabel::new(bx + w as f64 / 2.0, by + 40.0, title, TITLE_SIZE, Anchor::Middle));
}

/// Coloured squares drawn in the bitmap, names returned as labels
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[(String, Rgb)],
    labels: &mut Vec<TextLabel>,
) -> Result<()> {
    let (bx, by) = base(area);
    let (w, _) = area.dim_in_pixel();
    let mut x = MARGIN_LEFT;
    let mut y = 58;

    for (name, rgb) in entries {
        let label = TextLabel::new(0.0, 0.0, name.as_str(), LEGEND_SIZE, Anchor::Start);
        let advance = 22 + label.approx_width() as i32 + 24;
        if x + advance > w as i32 - MARGIN_RIGHT && x > MARGIN_LEFT {
            x = MARGIN_LEFT;
            y += 24;
        }
        area.draw(&Rectangle::new([(x, y), (x + 16, y + 16)], to_color(*rgb).filled()))
            .map_err(drawing)?;
        labels.push(TextLabel::new(
            bx + (x + 22) as f64,
            by + (y + 15) as f64,
            name.as_str(),
            LEGEND_SIZE,
            Anchor::Start,
        ));
        x += advance;
    }
    Ok(())
}

/// Maps data coordinates of a plot area to absolute bitmap pixels
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Frame {
    fn new<DB: DrawingBackend>(plot: &DrawingArea<DB, Shift>, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let (left, top) = base(plot);
        let (w, h) = plot.dim_in_pixel();
        Self {
            left,
            top,
            width: w as f64,
            height: h as f64,
            x_range,
            y_range,
        }
    }

    fn x(&self, value: f64) -> f64 {
        self.left + (value - self.x_range.0) / (self.x_range.1 - self.x_range.0) * self.width
    }

    fn y(&self, value: f64) -> f64 {
        self.top + self.height - (value - self.y_range.0) / (self.y_range.1 - self.y_range.0) * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Pad a data range so nothing sits on the frame edge
fn padded(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * fraction;
    (lo - pad, hi + pad)
}

fn ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| lo + (hi - lo) * i as f64 / (count - 1) as f64)
        .collect()
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn shorten(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let mut short: String = name.chars().take(max - 1).collect();
    short.push('.');
    short
}

/// Horizontal gridlines, y tick labels and the axis descriptions
fn draw_axes<DB: DrawingBackend>(
    plot: &DrawingArea<DB, Shift>,
    frame: &Frame,
    x_label: &str,
    y_label: &str,
    labels: &mut Vec<TextLabel>,
) -> Result<()> {
    let (w, h) = plot.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let grid = RGBColor(225, 225, 225);

    for value in ticks(frame.y_range.0, frame.y_range.1, Y_TICKS) {
        let y = (frame.y(value) - frame.top).round() as i32;
        plot.draw(&PathElement::new(vec![(0, y), (w, y)], grid.stroke_width(1)))
            .map_err(drawing)?;
        labels.push(TextLabel::new(
            frame.left - 10.0,
            frame.y(value) + TICK_SIZE / 3.0,
            format_tick(value),
            TICK_SIZE,
            Anchor::End,
        ));
    }

    plot.draw(&PathElement::new(vec![(0, 0), (0, h - 1), (w - 1, h - 1)], BLACK.stroke_width(2)))
        .map_err(drawing)?;

    labels.push(TextLabel::new(
        frame.center_x(),
        frame.bottom() + 65.0,
        x_label,
        AXIS_SIZE,
        Anchor::Middle,
    ));
    labels.push(TextLabel::new(frame.left, frame.top - 8.0, y_label, AXIS_SIZE, Anchor::End));
    Ok(())
}

fn plot_area<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> DrawingArea<DB, Shift> {
    area.margin(MARGIN_TOP, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT)
}

fn draw_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &PieChart,
    labels: &mut Vec<TextLabel>,
) -> Result<()> {
    push_title(area, &chart.title, labels);

    let total: f64 = chart.slices.iter().map(|s| s.percentage).sum();
    if total <= 0.0 {
        return Err(RenderError::InvalidData("pie chart has no slices".to_string()));
    }

    let (w, h) = area.dim_in_pixel();
    let (cx, cy) = (w as f64 / 2.0, (h as f64 + MARGIN_TOP as f64 / 2.0) / 2.0);
    let radius = (w.min(h) as f64 / 2.0) - 90.0;
    let (bx, by) = base(area);

    // counter-clockwise from twelve o'clock
    let mut start = 90.0_f64;
    for slice in &chart.slices {
        let sweep = 360.0 * slice.percentage / total;
        let steps = sweep.ceil().max(1.0) as usize;
        let mut points = vec![(cx.round() as i32, cy.round() as i32)];
        for step in 0..=steps {
            let angle = (start + sweep * step as f64 / steps as f64).to_radians();
            points.push((
                (cx + radius * angle.cos()).round() as i32,
                (cy - radius * angle.sin()).round() as i32,
            ));
        }
        area.draw(&Polygon::new(points, to_color(slice.color).filled()))
            .map_err(drawing)?;

        let mid = (start + sweep / 2.0).to_radians();
        let anchor = if mid.cos() >= 0.0 { Anchor::Start } else { Anchor::End };
        labels.push(TextLabel::new(
            bx + cx + radius * 1.08 * mid.cos(),
            by + cy - radius * 1.08 * mid.sin() + LEGEND_SIZE / 3.0,
            format!("{} ({:.1}%)", slice.label, slice.percentage),
            LEGEND_SIZE,
            anchor,
        ));
        start += sweep;
    }
    Ok(())
}

fn draw_grouped_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &GroupedBarChart,
    labels: &mut Vec<TextLabel>,
) -> Result<()> {
    push_title(area, &chart.title, labels);
    let legend: Vec<(String, Rgb)> = chart.series.iter().map(|s| (s.label.clone(), s.color)).collect();
    draw_legend(area, &legend, labels)?;

    let categories = chart.categories.len().max(1) as f64;
    let (lo, hi) = chart.value_range();
    let y_range = if lo == hi { (0.0, 1.0) } else { (lo * 1.1, hi * 1.1) };

    let plot = plot_area(area);
    let frame = Frame::new(&plot, (0.0, categories), y_range);
    draw_axes(&plot, &frame, &chart.x_label, &chart.y_label, labels)?;

    let mut ctx = ChartBuilder::on(&plot)
        .build_cartesian_2d(0.0..categories, y_range.0..y_range.1)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    let bar_width = 0.8 / chart.series.len().max(1) as f64;
    for (s, series) in chart.series.iter().enumerate() {
        let color = to_color(series.color);
        ctx.draw_series(series.values.iter().enumerate().map(|(i, value)| {
            let x0 = i as f64 + 0.1 + bar_width * s as f64;
            Rectangle::new([(x0, 0.0), (x0 + bar_width, *value)], color.filled())
        }))
        .map_err(drawing)?;
    }

    let max_chars = ((frame.width / categories) / (TICK_SIZE * CHAR_WIDTH)).floor().max(3.0) as usize;
    for (i, category) in chart.categories.iter().enumerate() {
        labels.push(TextLabel::new(
            frame.x(i as f64 + 0.5),
            frame.bottom() + 28.0,
            shorten(category, max_chars),
            TICK_SIZE,
            Anchor::Middle,
        ));
    }
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &ScatterChart,
    labels: &mut Vec<TextLabel>,
) -> Result<()> {
    push_title(area, &chart.title, labels);
    let legend: Vec<(String, Rgb)> = chart.series.iter().map(|s| (s.label.clone(), s.color)).collect();
    draw_legend(area, &legend, labels)?;

    let bounds = |f: fn(&crate::charts::ScatterPoint) -> f64| {
        chart
            .points()
            .map(f)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
    };
    let (x_lo, x_hi) = bounds(|p| p.x);
    let (y_lo, y_hi) = bounds(|p| p.y);
    let x_range = padded(x_lo, x_hi, 0.05);
    let y_range = padded(y_lo, y_hi, 0.05);

    let plot = plot_area(area);
    let frame = Frame::new(&plot, x_range, y_range);
    draw_axes(&plot, &frame, &chart.x_label, &chart.y_label, labels)?;

    let mut ctx = ChartBuilder::on(&plot)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    for series in &chart.series {
        let color = to_color(series.color);
        ctx.draw_series(LineSeries::new(
            series.points.iter().map(|p| (p.x, p.y)),
            color.mix(0.6).stroke_width(2),
        ))
        .map_err(drawing)?;
        ctx.draw_series(
            series
                .points
                .iter()
                .map(|p| Circle::new((p.x, p.y), 7, color.filled())),
        )
        .map_err(drawing)?;
    }

    for value in ticks(x_range.0, x_range.1, Y_TICKS) {
        labels.push(TextLabel::new(
            frame.x(value),
            frame.bottom() + 28.0,
            format_tick(value),
            TICK_SIZE,
            Anchor::Middle,
        ));
    }
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &HistogramChart,
    labels: &mut Vec<TextLabel>,
) -> Result<()> {
    push_title(area, &chart.title, labels);

    let (Some(first), Some(last)) = (chart.bins.first(), chart.bins.last()) else {
        return Err(RenderError::InvalidData("histogram has no bins".to_string()));
    };
    let x_range = (first.lower, last.upper);
    let max_count = chart.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
    let y_range = (0.0, max_count * 1.15);

    let plot = plot_area(area);
    let frame = Frame::new(&plot, x_range, y_range);
    draw_axes(&plot, &frame, &chart.x_label, &chart.y_label, labels)?;

    let mut ctx = ChartBuilder::on(&plot)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    ctx.draw_series(chart.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
            to_color(bin.color).filled(),
        )
    }))
    .map_err(drawing)?;
    ctx.draw_series(chart.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
            BLACK.mix(0.7).stroke_width(1),
        )
    }))
    .map_err(drawing)?;

    if let Some(average) = chart.average {
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![(average, 0.0), (average, y_range.1)],
            to_color(crate::charts::color::AVERAGE_MARKER).stroke_width(3),
        )))
        .map_err(drawing)?;
        labels.push(TextLabel::new(
            frame.x(average) + 8.0,
            frame.top + 24.0,
            format!("Average: {average:.1}"),
            LEGEND_SIZE,
            Anchor::Start,
        ));
    }

    for (i, bin) in chart.bins.iter().enumerate() {
        if i % 2 == 0 {
            labels.push(TextLabel::new(
                frame.x(bin.lower),
                frame.bottom() + 28.0,
                format_tick(bin.lower),
                TICK_SIZE,
                Anchor::Middle,
            ));
        }
    }
    labels.push(TextLabel::new(
        frame.x(last.upper),
        frame.bottom() + 28.0,
        format_tick(last.upper),
        TICK_SIZE,
        Anchor::Middle,
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::compose_charts;
    use crate::distribution::distribution;
    use eqlens_common::EquipmentRecord;

    fn sample() -> Vec<EquipmentRecord> {
        vec![
            EquipmentRecord::new("P1", "Pump", 30.0, 5.0, 20.0),
            EquipmentRecord::new("V1", "Valve", 10.0, 3.0, 40.0),
            EquipmentRecord::new("P2", "Pump", 10.0, 7.0, 60.0),
        ]
    }

    fn pixel(grid: &RenderedGrid, x: u32, y: u32) -> (u8, u8, u8) {
        let i = ((y * grid.width + x) * 3) as usize;
        (grid.pixels[i], grid.pixels[i + 1], grid.pixels[i + 2])
    }

    #[test]
    fn test_grid_dimensions() {
        let records = sample();
        let grid = render_grid(&compose_charts(&records, &distribution(&records))).unwrap();
        assert_eq!(grid.pixels.len(), (GRID_WIDTH * GRID_HEIGHT * 3) as usize);
        assert!(grid.pixels.iter().any(|b| *b != 255));
    }

    #[test]
    fn test_titles_land_in_their_cells() {
        let records = sample();
        let grid = render_grid(&compose_charts(&records, &distribution(&records))).unwrap();

        let find = |text: &str| grid.labels.iter().find(|l| l.text == text).unwrap();
        let pie = find("Equipment Type Distribution");
        let hist = find("Temperature Distribution");
        assert!(pie.x < (GRID_WIDTH / 2) as f64 && pie.y < (GRID_HEIGHT / 2) as f64);
        assert!(hist.x > (GRID_WIDTH / 2) as f64 && hist.y > (GRID_HEIGHT / 2) as f64);
        assert!(grid.labels.iter().any(|l| l.text.starts_with("Average: ")));
    }

    #[test]
    fn test_placeholders_render_messages() {
        let grid = render_grid(&compose_charts(&[], &[])).unwrap();
        let messages: Vec<&str> = grid.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(messages, vec!["No data to show"; 4]);
        // centre of a placeholder cell stays blank
        assert_eq!(pixel(&grid, GRID_WIDTH / 4, GRID_HEIGHT / 4), (255, 255, 255));
    }

    #[test]
    fn test_pie_fills_center() {
        let records = sample();
        let grid = render_grid(&compose_charts(&records, &distribution(&records))).unwrap();
        // a point just inside the first slice, above the pie centre
        let cy = ((GRID_HEIGHT / 2) as f64 + MARGIN_TOP as f64 / 2.0) / 2.0;
        assert_ne!(pixel(&grid, GRID_WIDTH / 4, (cy - 40.0) as u32), (255, 255, 255));
    }

    #[test]
    fn test_label_anchor_geometry() {
        let label = TextLabel::new(100.0, 0.0, "abcd", 10.0, Anchor::End);
        assert!((label.approx_width() - 22.0).abs() < 1e-9);
        assert!((label.left() - 78.0).abs() < 1e-9);
    }

    #[test]
    fn test_shorten_long_names() {
        assert_eq!(shorten("Pump", 8), "Pump");
        assert_eq!(shorten("Centrifugal", 6), "Centr.");
    }
}
