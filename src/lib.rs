//! # survey-stats
//!
//! Analysis helpers for a research study comparing two groups of course
//! participants ("EE" and control group) across attitude and demographic
//! survey questions.
//!
//! The crate wraps spreadsheet-derived tabular data and provides:
//! - header normalization for two-level spreadsheet exports ([`table`])
//! - parametric and non-parametric group comparisons ([`stats`])
//! - result tables with one row per tested variable ([`compare`])
//! - Likert-scale and pie chart rendering for presentation ([`charts`])
//!
//! Every helper is an independent, stateless transformation over an
//! in-memory table; callers chain them from an analysis script such as
//! the `analyze-survey` tool in this workspace.

pub mod charts;
pub mod compare;
pub mod stats;
pub mod table;

pub use compare::{
    anova_table, levene_table, mann_whitney_table, pairwise_table, t_test_table,
    welch_anova_table,
};
pub use stats::significance::significance_stars;
pub use table::{GroupScores, SurveyTable};
