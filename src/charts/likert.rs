//! Diverging stacked bar charts for Likert-scale questions
//!
//! Renders the classic Likert presentation: per question, the share of
//! disagreement (scale points 1-3 plus half of the neutral 4) extends
//! left of center, agreement (half of 4 plus 5-7) extends right. One bar
//! per question, percentages of that question's total responses.

use super::{PlotError, Result, CHART_SIZE, LIKERT_COLORS};
use plotters::prelude::*;
use std::path::Path;

/// Number of points on the agreement scale
pub const SCALE_POINTS: usize = 7;

/// Response counts of one Likert question
#[derive(Debug, Clone)]
pub struct LikertQuestion {
    /// Question label shown on the Y axis
    pub label: String,
    /// Response counts for scale points 1 through 7
    pub counts: [u64; SCALE_POINTS],
}

impl LikertQuestion {
    /// Creates a question from its label and per-point counts
    pub fn new(label: impl Into<String>, counts: [u64; SCALE_POINTS]) -> Self {
        Self {
            label: label.into(),
            counts,
        }
    }

    /// Total number of responses to this question
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Percentage spans of each scale point around the center line
///
/// Returns `(start, end)` in percent for each of the seven categories,
/// with disagreement left of zero and agreement right; the neutral
/// category straddles the center. `None` when the question has no
/// responses.
fn category_spans(counts: &[u64; SCALE_POINTS]) -> Option<[(f64, f64); SCALE_POINTS]> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return None;
    }

    let percentages: Vec<f64> = counts
        .iter()
        .map(|&count| count as f64 / total as f64 * 100.0)
        .collect();

    // Disagreement plus half the neutral share sits left of center
    let left_extent = percentages[0] + percentages[1] + percentages[2] + percentages[3] / 2.0;

    let mut spans = [(0.0, 0.0); SCALE_POINTS];
    let mut cursor = -left_extent;
    for (index, &percentage) in percentages.iter().enumerate() {
        spans[index] = (cursor, cursor + percentage);
        cursor += percentage;
    }
    Some(spans)
}

/// Creates a diverging stacked bar chart for a set of Likert questions
///
/// # Arguments
/// * `questions` - One entry per question, in top-to-bottom display order
/// * `title` - Chart title displayed at the top of the plot
/// * `output_path` - Path where the PNG file should be saved
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If validation or chart generation failed
///
/// # Chart Properties
/// * Resolution: 1200x800 pixels, PNG
/// * X-axis: -100..100 percent, labeled with absolute percentages
/// * Y-axis: one bar per question, labeled with the question text
/// * Colors: fixed seven-step diverging palette with a legend
pub fn create_likert_chart(
    questions: &[LikertQuestion],
    title: &str,
    output_path: &Path,
) -> Result<()> {
    if questions.is_empty() {
        return Err(PlotError::InvalidData(
            "Questions cannot be empty".to_string(),
        ));
    }
    for question in questions {
        if question.total() == 0 {
            return Err(PlotError::InvalidData(format!(
                "Question '{}' has no responses",
                question.label
            )));
        }
    }

    let root = BitMapBackend::new(output_path, CHART_SIZE);
    let drawing_area = root.into_drawing_area();

    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let question_count = questions.len();
    let y_range = -0.5..(question_count as f64 - 0.5);

    let mut chart_context = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(220)
        .build_cartesian_2d(-100.0..100.0, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let labels: Vec<String> = questions.iter().map(|q| q.label.clone()).collect();
    chart_context
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Percentage of responses")
        .x_label_style(("sans-serif", 25))
        .x_label_formatter(&|x: &f64| format!("{:.0}%", x.abs()))
        .y_labels(question_count)
        .y_label_style(("sans-serif", 22))
        .y_label_formatter(&|y| {
            let index = y.round();
            if (y - index).abs() < 1e-6 && index >= 0.0 && (index as usize) < labels.len() {
                labels[index as usize].clone()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // One series per scale point so the legend lists all seven colors
    for point in 0..SCALE_POINTS {
        let color = LIKERT_COLORS[point];
        let bars: Vec<Rectangle<(f64, f64)>> = questions
            .iter()
            .enumerate()
            .filter_map(|(index, question)| {
                let spans = category_spans(&question.counts)?;
                let (start, end) = spans[point];
                let y = index as f64;
                Some(Rectangle::new(
                    [(start, y - 0.35), (end, y + 0.35)],
                    color.filled(),
                ))
            })
            .collect();

        chart_context
            .draw_series(bars)
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(format!("{}", point + 1))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    // Center line separating disagreement from agreement
    chart_context
        .draw_series(LineSeries::new(
            vec![(0.0, -0.5), (0.0, question_count as f64 - 0.5)],
            &BLACK,
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart_context
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 22))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}
