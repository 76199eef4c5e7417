//! Chart rendering for presentation
//!
//! This module renders the two chart families of the study with the
//! [`plotters`] crate: diverging stacked bar charts for Likert items
//! ([`likert`]) and pie charts for categorical distributions ([`pie`]).
//! Charts are saved as PNG files with fixed 1200x800 resolution.

pub mod likert;
pub mod pie;

pub use likert::{create_likert_chart, LikertQuestion};
pub use pie::{create_pie_chart, format_percentage_label};

use plotters::style::RGBColor;
use thiserror::Error;

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Chart resolution used by every plot (pixels)
pub(crate) const CHART_SIZE: (u32, u32) = (1200, 800);

/// Diverging seven-step palette for the 1-7 agreement scale
/// (disagree reds through a neutral grey to agree blues)
pub(crate) const LIKERT_COLORS: [RGBColor; 7] = [
    RGBColor(178, 24, 43),
    RGBColor(214, 96, 77),
    RGBColor(244, 165, 130),
    RGBColor(224, 224, 224),
    RGBColor(146, 197, 222),
    RGBColor(67, 147, 195),
    RGBColor(33, 102, 172),
];

/// Categorical palette for pie slices
pub(crate) const PIE_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];
