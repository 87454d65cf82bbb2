//! Two-page PDF report
//!
//! Page one carries the statistics text from [`summary_lines`], page two
//! the chart grid from [`crate::render::render_grid`] with its labels set in
//! the built-in Helvetica.

use chrono::SecondsFormat;
use eqlens_common::{Dataset, EquipmentRecord};
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
};
use tracing::{debug, warn};

use crate::charts::compose_charts;
use crate::distribution::{distribution, DistributionEntry};
use crate::error::ReportError;
use crate::render::{render_grid, RenderedGrid};
use crate::stats::{aggregate, DatasetStats};

/// US Letter
pub const PAGE_WIDTH_MM: f32 = 215.9;
pub const PAGE_HEIGHT_MM: f32 = 279.4;
const PAGE_MARGIN_MM: f32 = 12.7;

const MM_PER_INCH: f32 = 25.4;
const PT_PER_MM: f32 = 72.0 / MM_PER_INCH;

const LINE_HEIGHT_MM: f32 = 7.0;
const BODY_SIZE_PT: f32 = 11.0;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Statistics text for the first report page, one entry per line.
///
/// The output depends only on its inputs: averages come from the values
/// cached on `dataset`, the spread from `stats`.
pub fn summary_lines(dataset: &Dataset, stats: &DatasetStats) -> Vec<String> {
    vec![
        format!("Filename:         {}", dataset.filename),
        format!(
            "Uploaded:         {}",
            dataset.uploaded_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        format!("Total Equipment:  {}", dataset.total_count),
        String::new(),
        "Average Values".to_string(),
        format!("  Flowrate:       {:.2}", dataset.avg_flowrate),
        format!("  Pressure:       {:.2}", dataset.avg_pressure),
        format!("  Temperature:    {:.2}", dataset.avg_temperature),
        String::new(),
        "Flowrate Distribution".to_string(),
        format!("  Median:         {:.2}", stats.flowrate.median),
        format!("  Std Dev:        {:.2}", stats.flowrate.std_dev),
        format!("  Min:            {:.2}", stats.flowrate.min),
        format!("  Max:            {:.2}", stats.flowrate.max),
    ]
}

fn type_lines(entries: &[DistributionEntry]) -> Vec<String> {
    let mut lines = vec!["Equipment Types".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|e| format!("  {:<16}{}", format!("{}:", e.equipment_type), e.count)),
    );
    lines
}

/// Render the full PDF report for a dataset.
///
/// # Errors
///
/// [`ReportError::NoEquipmentData`] when `records` is empty, and
/// [`ReportError::InternalRender`] when chart rasterisation or PDF
/// serialisation fails.
#[tracing::instrument(skip(dataset, records), fields(dataset_id = %dataset.id))]
pub fn render_report(dataset: &Dataset, records: &[EquipmentRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(ReportError::NoEquipmentData);
    }
    if dataset.total_count != records.len() {
        warn!(
            declared = dataset.total_count,
            actual = records.len(),
            "Record count differs from the value stored at ingestion"
        );
    }

    let stats = aggregate(records)?;
    let entries = distribution(records);
    let charts = compose_charts(records, &entries);
    let grid = render_grid(&charts)?;

    let (doc, page, layer) = PdfDocument::new(
        format!("Equipment Analysis Report - {}", dataset.filename),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Summary",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        mono: doc.add_builtin_font(BuiltinFont::Courier)?,
    };

    let summary = doc.get_page(page).get_layer(layer);
    write_summary_page(&summary, &fonts, dataset, &stats, &entries);

    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Charts");
    let charts_layer = doc.get_page(page).get_layer(layer);
    write_chart_page(charts_layer, &fonts, dataset, grid)?;

    let bytes = compress_streams(&doc.save_to_bytes()?)?;
    debug!(bytes = bytes.len(), "Rendered report");
    Ok(bytes)
}

/// Flate-compress every stream printpdf left unfiltered, the chart bitmap
/// included
fn compress_streams(pdf: &[u8]) -> Result<Vec<u8>> {
    let render_failure = |e: &dyn std::fmt::Display| ReportError::InternalRender(e.to_string());

    let mut document = lopdf::Document::load_mem(pdf).map_err(|e| render_failure(&e))?;
    document.compress();

    let mut out = Vec::with_capacity(pdf.len() / 4);
    document.save_to(&mut out).map_err(|e| render_failure(&e))?;
    Ok(out)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

fn write_summary_page(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    dataset: &Dataset,
    stats: &DatasetStats,
    entries: &[DistributionEntry],
) {
    let mut y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM - 10.0;
    layer.use_text("Equipment Analysis Report", 20.0, Mm(PAGE_MARGIN_MM + 5.0), Mm(y), &fonts.bold);
    y -= LINE_HEIGHT_MM * 2.0;

    let mut lines = summary_lines(dataset, stats);
    lines.push(String::new());
    lines.extend(type_lines(entries));

    let capacity = ((y - PAGE_MARGIN_MM) / LINE_HEIGHT_MM).floor() as usize + 1;
    for line in fit_lines(lines, capacity) {
        if !line.is_empty() {
            let heading = !line.starts_with(' ') && !line.contains(':');
            let font = if heading { &fonts.bold } else { &fonts.mono };
            layer.use_text(line, BODY_SIZE_PT, Mm(PAGE_MARGIN_MM + 5.0), Mm(y), font);
        }
        y -= LINE_HEIGHT_MM;
    }
}

/// Keep at most `capacity` lines, replacing the overflow with a count of
/// what was left out
fn fit_lines(mut lines: Vec<String>, capacity: usize) -> Vec<String> {
    if lines.len() <= capacity || capacity == 0 {
        lines.truncate(capacity);
        return lines;
    }
    let hidden = lines.len() - (capacity - 1);
    lines.truncate(capacity - 1);
    lines.push(format!("  +{hidden} more (see chart page)"));
    lines
}

fn write_chart_page(
    layer: PdfLayerReference,
    fonts: &Fonts,
    dataset: &Dataset,
    grid: RenderedGrid,
) -> Result<()> {
    let heading_y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM - 8.0;
    layer.use_text(
        format!("Equipment Analysis Dashboard - {}", dataset.filename),
        16.0,
        Mm(PAGE_MARGIN_MM + 5.0),
        Mm(heading_y),
        &fonts.bold,
    );

    // fit the bitmap to the page width, then to the remaining height
    let available_w = PAGE_WIDTH_MM - 2.0 * PAGE_MARGIN_MM;
    let available_h = heading_y - 6.0 - PAGE_MARGIN_MM;
    let mm_per_px = (available_w / grid.width as f32).min(available_h / grid.height as f32);
    let image_w = grid.width as f32 * mm_per_px;
    let image_h = grid.height as f32 * mm_per_px;
    let left = (PAGE_WIDTH_MM - image_w) / 2.0;
    let top = heading_y - 6.0;

    let RenderedGrid {
        width,
        height,
        pixels,
        labels,
    } = grid;
    let buffer = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        ReportError::InternalRender("chart bitmap does not match its dimensions".to_string())
    })?;
    let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer));
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(left)),
            translate_y: Some(Mm(top - image_h)),
            dpi: Some(width as f32 * MM_PER_INCH / image_w),
            ..Default::default()
        },
    );

    for label in &labels {
        let size_pt = label.size as f32 * mm_per_px * PT_PER_MM;
        let x = left + label.left() as f32 * mm_per_px;
        let y = top - label.y as f32 * mm_per_px;
        layer.use_text(label.text.as_str(), size_pt, Mm(x), Mm(y), &fonts.regular);
    }
    Ok(())
}
