//! Pie charts for categorical survey distributions
//!
//! Renders demographic breakdowns (gender, study program, prior
//! experience, ...) as pie charts with percentage labels that also carry
//! the absolute count, so readers can recover the group sizes.

use super::{PlotError, Result, CHART_SIZE, PIE_COLORS};
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;

/// Formats the percentage label of one slice
///
/// Renders `"{pct:.1}% (n={count})"`. The percentage is of `total`, so
/// the count implied by the label (percentage x total / 100, rounded)
/// recovers `count` for any realistically sized survey.
pub fn format_percentage_label(count: u64, total: u64) -> String {
    let percentage = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    format!("{:.1}% (n={})", percentage, count)
}

/// Creates a pie chart of category counts and saves it as a PNG file
///
/// # Arguments
/// * `slices` - Category labels with their counts, in display order
/// * `title` - Chart title displayed at the top of the plot
/// * `output_path` - Path where the PNG file should be saved
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If validation or chart generation failed
///
/// # Chart Properties
/// * Resolution: 1200x800 pixels, PNG
/// * Slices start at twelve o'clock and run clockwise in input order
/// * Labels: `"{category}: {pct:.1}% (n={count})"`
/// * Colors: fixed categorical palette, cycled when more than eight slices
pub fn create_pie_chart(
    slices: &[(String, u64)],
    title: &str,
    output_path: &Path,
) -> Result<()> {
    if slices.is_empty() {
        return Err(PlotError::InvalidData("Slices cannot be empty".to_string()));
    }
    let total: u64 = slices.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Err(PlotError::InvalidData(
            "Slices contain no responses".to_string(),
        ));
    }

    let root = BitMapBackend::new(output_path, CHART_SIZE);
    let drawing_area = root.into_drawing_area();

    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let titled_area = drawing_area
        .titled(title, ("sans-serif", 40).into_font())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let (width, height) = titled_area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = (width.min(height) as f64) * 0.32;

    let sizes: Vec<f64> = slices.iter().map(|(_, count)| *count as f64).collect();
    let colors: Vec<RGBColor> = (0..slices.len())
        .map(|index| PIE_COLORS[index % PIE_COLORS.len()])
        .collect();
    let labels: Vec<String> = slices
        .iter()
        .map(|(label, count)| format!("{}: {}", label, format_percentage_label(*count, total)))
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 28).into_font().color(&BLACK));

    titled_area
        .draw(&pie)
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    titled_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}
