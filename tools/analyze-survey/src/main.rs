//! Survey analysis pipeline
//!
//! Runs the full comparison workflow over a survey CSV export: load and
//! repair the table, compare the EE and control groups on every requested
//! variable, write the result tables as text reports and render the
//! Likert and pie charts. Each stage delegates to the `survey-stats`
//! library; this binary only sequences them.

use argh::FromArgs;
use indicatif::ProgressBar;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use survey_stats::charts::likert::SCALE_POINTS;
use survey_stats::charts::{create_likert_chart, create_pie_chart, LikertQuestion, PlotError};
use survey_stats::compare::{
    anova_table, format_result_table, levene_table, mann_whitney_table, pairwise_table,
    t_test_table, welch_anova_table, AnovaRow, CompareError, LeveneRow, MannWhitneyRow,
    PairwiseRow, TTestRow,
};
use survey_stats::stats::TTestKind;
use survey_stats::table::{SurveyTable, TableError};
use thiserror::Error;

/// Errors that can occur while running the analysis pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),

    #[error("Failed to write report: {0}")]
    ReportWrite(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}

type Result<T> = core::result::Result<T, PipelineError>;

/// Statistical comparison of survey responses between course groups
#[derive(FromArgs, Debug)]
pub struct Args {
    /// input CSV export with two header rows
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// output directory for reports and charts (default: analysis-output)
    #[argh(option, short = 'o', default = "PathBuf::from(\"analysis-output\")")]
    output: PathBuf,

    /// column holding the respondent group label (default: Group)
    #[argh(option, short = 'g', default = "String::from(\"Group\")")]
    group_column: String,

    /// likert-scale variable (1-7), repeatable
    #[argh(option, short = 'l')]
    likert: Vec<String>,

    /// numeric demographic variable, repeatable
    #[argh(option, short = 'n')]
    numeric: Vec<String>,

    /// categorical variable rendered as a pie chart, repeatable
    #[argh(option, short = 'p')]
    pie: Vec<String>,

    /// multi-level factor column; adds ANOVA, Welch ANOVA and post-hoc tables
    #[argh(option, short = 'f')]
    factor: Option<String>,
}

/// Machine-readable companion to the text reports
#[derive(Debug, Default, Serialize)]
struct AnalysisReport {
    levene: Vec<LeveneRow>,
    t_tests: Vec<TTestRow>,
    mann_whitney: Vec<MannWhitneyRow>,
    anova: Vec<AnovaRow>,
    welch_anova: Vec<AnovaRow>,
    posthoc: Vec<PairwiseRow>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    if !args.input.exists() {
        eprintln!("Error: Input file does not exist: {}", args.input.display());
        std::process::exit(1);
    }
    if args.likert.is_empty() && args.numeric.is_empty() && args.pie.is_empty() {
        eprintln!("Error: No variables selected; pass --likert, --numeric or --pie");
        std::process::exit(1);
    }

    fs::create_dir_all(&args.output)?;

    println!("📊 Loading survey data: {}", args.input.display());
    let mut table = SurveyTable::from_csv_path(&args.input)?;
    table.repair_headers();
    println!(
        "   ✅ {} respondents, {} columns",
        table.row_count(),
        table.column_count()
    );

    let mut report = AnalysisReport::default();

    let likert: Vec<&str> = args.likert.iter().map(String::as_str).collect();
    let numeric: Vec<&str> = args.numeric.iter().map(String::as_str).collect();

    // Two-group comparisons: Mann-Whitney for the ordinal Likert items,
    // t-tests (with Levene pre-check) for the numeric demographics
    if !likert.is_empty() {
        println!("📐 Comparing {} Likert variables (Mann-Whitney)", likert.len());
        report.mann_whitney = mann_whitney_table(&table, &args.group_column, &likert)?;
        write_report(
            &args.output.join("mann-whitney.txt"),
            &format_result_table(&report.mann_whitney, Some("Mann-Whitney U Comparison")),
        )?;
    }

    if !numeric.is_empty() {
        println!("📐 Comparing {} numeric variables (t-test)", numeric.len());
        report.levene = levene_table(&table, &args.group_column, &numeric)?;
        report.t_tests = t_test_table(&table, &args.group_column, &numeric, TTestKind::Auto)?;
        write_report(
            &args.output.join("levene.txt"),
            &format_result_table(&report.levene, Some("Levene Variance Equality")),
        )?;
        write_report(
            &args.output.join("t-tests.txt"),
            &format_result_table(&report.t_tests, Some("Independent t-Test Comparison")),
        )?;
    }

    // Multi-group comparisons across the factor levels
    if let Some(factor) = &args.factor {
        let variables: Vec<&str> = likert.iter().chain(numeric.iter()).copied().collect();
        if !variables.is_empty() {
            println!("📐 ANOVA across '{}' levels", factor);
            report.anova = anova_table(&table, factor, &variables)?;
            report.welch_anova = welch_anova_table(&table, factor, &variables)?;
            report.posthoc = pairwise_table(&table, factor, &variables)?;
            write_report(
                &args.output.join("anova.txt"),
                &format_result_table(&report.anova, Some("One-Way ANOVA")),
            )?;
            write_report(
                &args.output.join("welch-anova.txt"),
                &format_result_table(&report.welch_anova, Some("Welch ANOVA")),
            )?;
            write_report(
                &args.output.join("posthoc.txt"),
                &format_result_table(&report.posthoc, Some("Post-hoc Pairwise (Holm)")),
            )?;
        }
    }

    if !likert.is_empty() {
        generate_likert_charts(&table, &args, &likert)?;
    }
    generate_pie_charts(&table, &args)?;

    let json_path = args.output.join("report.json");
    fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;

    println!("🎉 Analysis complete!");
    println!("   📂 Reports and charts saved to: {}", args.output.display());

    Ok(())
}

/// Writes one text report and reports the path
fn write_report(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)?;
    println!("   💾 Wrote {}", path.display());
    Ok(())
}

/// Renders one diverging Likert chart per respondent group
fn generate_likert_charts(
    table: &SurveyTable,
    args: &Args,
    variables: &[&str],
) -> Result<()> {
    // Group labels in first-seen order, taken from the first variable
    let group_labels: Vec<String> = table
        .split_by_group(&args.group_column, variables[0])?
        .into_iter()
        .map(|scores| scores.group)
        .collect();

    println!("📈 Rendering Likert charts for {} groups", group_labels.len());
    let progress = ProgressBar::new((group_labels.len() * variables.len()) as u64);

    for group_label in &group_labels {
        let mut questions = Vec::with_capacity(variables.len());
        for &variable in variables {
            let groups = table.split_by_group(&args.group_column, variable)?;
            let scores = groups
                .iter()
                .find(|scores| &scores.group == group_label)
                .map(|scores| scores.values.as_slice())
                .unwrap_or(&[]);
            questions.push(LikertQuestion::new(variable, scale_counts(scores)));
            progress.inc(1);
        }

        let file_name = format!("likert-{}.png", sanitize_file_name(group_label));
        let chart_path = args.output.join(file_name);
        create_likert_chart(
            &questions,
            &format!("Attitudes ({})", group_label),
            &chart_path,
        )?;
        println!("   🖼️  Wrote {}", chart_path.display());
    }

    progress.finish_and_clear();
    Ok(())
}

/// Renders one pie chart per categorical variable
fn generate_pie_charts(table: &SurveyTable, args: &Args) -> Result<()> {
    if args.pie.is_empty() {
        return Ok(());
    }

    println!("📈 Rendering {} pie charts", args.pie.len());
    for variable in &args.pie {
        let counts = table.category_counts(variable)?;
        let file_name = format!("pie-{}.png", sanitize_file_name(variable));
        let chart_path = args.output.join(file_name);
        create_pie_chart(&counts, variable, &chart_path)?;
        println!("   🖼️  Wrote {}", chart_path.display());
    }
    Ok(())
}

/// Tallies numeric responses into the seven scale-point buckets
///
/// Responses outside 1-7 (data-entry noise) are ignored.
fn scale_counts(values: &[f64]) -> [u64; SCALE_POINTS] {
    let mut counts = [0u64; SCALE_POINTS];
    for &value in values {
        let rounded = value.round();
        if (1.0..=SCALE_POINTS as f64).contains(&rounded) {
            counts[rounded as usize - 1] += 1;
        }
    }
    counts
}

/// Lowercases a label and collapses everything non-alphanumeric to dashes
fn sanitize_file_name(label: &str) -> String {
    let mut name = String::with_capacity(label.len());
    let mut previous_dash = false;
    for character in label.chars() {
        if character.is_ascii_alphanumeric() {
            name.extend(character.to_lowercase());
            previous_dash = false;
        } else if !previous_dash {
            name.push('-');
            previous_dash = true;
        }
    }
    name.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_counts_buckets_and_ignores_outliers() {
        let counts = scale_counts(&[1.0, 2.0, 2.0, 7.0, 8.0, 0.0, 3.6]);
        assert_eq!(counts, [1, 2, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Control Group"), "control-group");
        assert_eq!(sanitize_file_name("EE"), "ee");
        assert_eq!(sanitize_file_name("Age (years)"), "age-years");
    }
}
