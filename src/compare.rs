//! Result-table orchestration
//!
//! Builds the presentation tables of the study: one row per tested
//! variable (in the caller's order), with per-group descriptives, the
//! test statistic, p-value, effect size and significance stars. Rows are
//! plain structs rendered as ASCII tables with the [`tabled`] crate;
//! numeric columns are preformatted strings so the tables read the way
//! they appear in the paper.

use crate::stats::describe::{mean, median, std_dev};
use crate::stats::{
    levene, mann_whitney_u, one_way_anova, pairwise_welch, significance_stars, t_test,
    welch_anova, StatError, TTestKind,
};
use crate::table::{GroupScores, SurveyTable, TableError};
use serde::Serialize;
use tabled::{Table, Tabled};
use thiserror::Error;

/// Errors that can occur while building a result table
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Test failed for variable '{variable}': {source}")]
    Stat {
        variable: String,
        source: StatError,
    },

    #[error("Expected exactly two groups, got {got}")]
    TwoGroupsRequired { got: usize },
}

type Result<T> = core::result::Result<T, CompareError>;

/// Formats a test statistic or effect size with three decimals
fn format_stat(value: f64) -> String {
    format!("{:.3}", value)
}

/// Formats a mean or spread with two decimals
fn format_descriptive(value: f64) -> String {
    format!("{:.2}", value)
}

/// Formats a p-value the way the result tables print it
///
/// Values below a thousandth render as `<0.001`; stars are always derived
/// from the raw p-value, never from this string.
fn format_p(p: f64) -> String {
    if p < 0.001 {
        "<0.001".to_string()
    } else {
        format!("{:.3}", p)
    }
}

/// Formats degrees of freedom, dropping the fraction when integral
fn format_df(df: f64) -> String {
    if (df - df.round()).abs() < 1e-9 {
        format!("{:.0}", df)
    } else {
        format!("{:.2}", df)
    }
}

fn stat_error(variable: &str, source: StatError) -> CompareError {
    CompareError::Stat {
        variable: variable.to_string(),
        source,
    }
}

/// One row of a Levene variance-equality table
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct LeveneRow {
    #[tabled(rename = "Variable")]
    pub variable: String,
    #[tabled(rename = "W")]
    pub w: String,
    #[tabled(rename = "df1")]
    pub df_between: String,
    #[tabled(rename = "df2")]
    pub df_within: String,
    #[tabled(rename = "p")]
    pub p: String,
    #[tabled(rename = "Equal var.")]
    pub equal_variances: String,
    #[tabled(rename = "Sig.")]
    pub stars: String,
}

/// One row of an independent t-test table
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct TTestRow {
    #[tabled(rename = "Variable")]
    pub variable: String,
    #[tabled(rename = "N1")]
    pub n_a: usize,
    #[tabled(rename = "Mean1")]
    pub mean_a: String,
    #[tabled(rename = "SD1")]
    pub sd_a: String,
    #[tabled(rename = "N2")]
    pub n_b: usize,
    #[tabled(rename = "Mean2")]
    pub mean_b: String,
    #[tabled(rename = "SD2")]
    pub sd_b: String,
    #[tabled(rename = "t")]
    pub t: String,
    #[tabled(rename = "df")]
    pub df: String,
    #[tabled(rename = "p")]
    pub p: String,
    #[tabled(rename = "Cohen d")]
    pub cohen_d: String,
    #[tabled(rename = "Sig.")]
    pub stars: String,
}

/// One row of a Mann-Whitney table
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MannWhitneyRow {
    #[tabled(rename = "Variable")]
    pub variable: String,
    #[tabled(rename = "N1")]
    pub n_a: usize,
    #[tabled(rename = "Median1")]
    pub median_a: String,
    #[tabled(rename = "N2")]
    pub n_b: usize,
    #[tabled(rename = "Median2")]
    pub median_b: String,
    #[tabled(rename = "U")]
    pub u: String,
    #[tabled(rename = "z")]
    pub z: String,
    #[tabled(rename = "p")]
    pub p: String,
    #[tabled(rename = "RBC")]
    pub rank_biserial: String,
    #[tabled(rename = "Sig.")]
    pub stars: String,
}

/// One row of a one-way or Welch ANOVA table
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AnovaRow {
    #[tabled(rename = "Variable")]
    pub variable: String,
    #[tabled(rename = "F")]
    pub f: String,
    #[tabled(rename = "df1")]
    pub df_between: String,
    #[tabled(rename = "df2")]
    pub df_within: String,
    #[tabled(rename = "p")]
    pub p: String,
    #[tabled(rename = "Eta²")]
    pub eta_squared: String,
    #[tabled(rename = "Sig.")]
    pub stars: String,
}

/// One row of a post-hoc pairwise table
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PairwiseRow {
    #[tabled(rename = "Variable")]
    pub variable: String,
    #[tabled(rename = "Group A")]
    pub group_a: String,
    #[tabled(rename = "Group B")]
    pub group_b: String,
    #[tabled(rename = "Mean A")]
    pub mean_a: String,
    #[tabled(rename = "Mean B")]
    pub mean_b: String,
    #[tabled(rename = "t")]
    pub t: String,
    #[tabled(rename = "df")]
    pub df: String,
    #[tabled(rename = "p (unc.)")]
    pub p_uncorrected: String,
    #[tabled(rename = "p (Holm)")]
    pub p_corrected: String,
    #[tabled(rename = "Cohen d")]
    pub cohen_d: String,
    #[tabled(rename = "Sig.")]
    pub stars: String,
}

/// Splits a variable into per-group scores
fn grouped(
    table: &SurveyTable,
    group_column: &str,
    variable: &str,
) -> Result<Vec<GroupScores>> {
    Ok(table.split_by_group(group_column, variable)?)
}

/// Requires exactly two groups for the two-sample tests
fn two_groups(groups: &[GroupScores]) -> Result<(&GroupScores, &GroupScores)> {
    if groups.len() != 2 {
        return Err(CompareError::TwoGroupsRequired { got: groups.len() });
    }
    Ok((&groups[0], &groups[1]))
}

/// Builds a Levene variance-equality table, one row per variable
///
/// # Arguments
/// * `table` - Survey table with repaired headers
/// * `group_column` - Column holding the group label per respondent
/// * `variables` - Variables to test, in output order
pub fn levene_table(
    table: &SurveyTable,
    group_column: &str,
    variables: &[&str],
) -> Result<Vec<LeveneRow>> {
    let mut rows = Vec::with_capacity(variables.len());
    for &variable in variables {
        let groups = grouped(table, group_column, variable)?;
        let slices: Vec<&[f64]> = groups.iter().map(|g| g.values.as_slice()).collect();
        let result = levene(&slices).map_err(|e| stat_error(variable, e))?;

        rows.push(LeveneRow {
            variable: variable.to_string(),
            w: format_stat(result.w),
            df_between: format_df(result.df_between),
            df_within: format_df(result.df_within),
            p: format_p(result.p_value),
            equal_variances: if result.equal_variances(0.05) { "yes" } else { "no" }.to_string(),
            stars: significance_stars(result.p_value).to_string(),
        });
    }
    Ok(rows)
}

/// Builds an independent t-test table, one row per variable
///
/// Requires the group column to carry exactly two groups (EE and CG in
/// the study). `kind` selects the pooled, Welch or automatic variant.
pub fn t_test_table(
    table: &SurveyTable,
    group_column: &str,
    variables: &[&str],
    kind: TTestKind,
) -> Result<Vec<TTestRow>> {
    let mut rows = Vec::with_capacity(variables.len());
    for &variable in variables {
        let groups = grouped(table, group_column, variable)?;
        let (a, b) = two_groups(&groups)?;
        let result =
            t_test(&a.values, &b.values, kind).map_err(|e| stat_error(variable, e))?;

        rows.push(TTestRow {
            variable: variable.to_string(),
            n_a: a.values.len(),
            mean_a: format_descriptive(mean(&a.values).map_err(|e| stat_error(variable, e))?),
            sd_a: format_descriptive(std_dev(&a.values).map_err(|e| stat_error(variable, e))?),
            n_b: b.values.len(),
            mean_b: format_descriptive(mean(&b.values).map_err(|e| stat_error(variable, e))?),
            sd_b: format_descriptive(std_dev(&b.values).map_err(|e| stat_error(variable, e))?),
            t: format_stat(result.t),
            df: format_df(result.df),
            p: format_p(result.p_value),
            cohen_d: format_stat(result.cohen_d),
            stars: significance_stars(result.p_value).to_string(),
        });
    }
    Ok(rows)
}

/// Builds a Mann-Whitney table, one row per variable
///
/// The non-parametric two-group comparison used for the Likert items;
/// reports medians instead of means.
pub fn mann_whitney_table(
    table: &SurveyTable,
    group_column: &str,
    variables: &[&str],
) -> Result<Vec<MannWhitneyRow>> {
    let mut rows = Vec::with_capacity(variables.len());
    for &variable in variables {
        let groups = grouped(table, group_column, variable)?;
        let (a, b) = two_groups(&groups)?;
        let result = mann_whitney_u(&a.values, &b.values).map_err(|e| stat_error(variable, e))?;

        rows.push(MannWhitneyRow {
            variable: variable.to_string(),
            n_a: a.values.len(),
            median_a: format_descriptive(
                median(&a.values).map_err(|e| stat_error(variable, e))?,
            ),
            n_b: b.values.len(),
            median_b: format_descriptive(
                median(&b.values).map_err(|e| stat_error(variable, e))?,
            ),
            u: format_stat(result.u),
            z: format_stat(result.z),
            p: format_p(result.p_value),
            rank_biserial: format_stat(result.rank_biserial),
            stars: significance_stars(result.p_value).to_string(),
        });
    }
    Ok(rows)
}

/// Builds a one-way ANOVA table, one row per variable
pub fn anova_table(
    table: &SurveyTable,
    group_column: &str,
    variables: &[&str],
) -> Result<Vec<AnovaRow>> {
    let mut rows = Vec::with_capacity(variables.len());
    for &variable in variables {
        let groups = grouped(table, group_column, variable)?;
        let slices: Vec<&[f64]> = groups.iter().map(|g| g.values.as_slice()).collect();
        let result = one_way_anova(&slices).map_err(|e| stat_error(variable, e))?;

        rows.push(AnovaRow {
            variable: variable.to_string(),
            f: format_stat(result.f),
            df_between: format_df(result.df_between),
            df_within: format_df(result.df_within),
            p: format_p(result.p_value),
            eta_squared: format_stat(result.eta_squared),
            stars: significance_stars(result.p_value).to_string(),
        });
    }
    Ok(rows)
}

/// Builds a Welch ANOVA table, one row per variable
pub fn welch_anova_table(
    table: &SurveyTable,
    group_column: &str,
    variables: &[&str],
) -> Result<Vec<AnovaRow>> {
    let mut rows = Vec::with_capacity(variables.len());
    for &variable in variables {
        let groups = grouped(table, group_column, variable)?;
        let slices: Vec<&[f64]> = groups.iter().map(|g| g.values.as_slice()).collect();
        let result = welch_anova(&slices).map_err(|e| stat_error(variable, e))?;

        rows.push(AnovaRow {
            variable: variable.to_string(),
            f: format_stat(result.f),
            df_between: format_df(result.df_between),
            df_within: format_df(result.df_within),
            p: format_p(result.p_value),
            eta_squared: format_stat(result.eta_squared),
            stars: significance_stars(result.p_value).to_string(),
        });
    }
    Ok(rows)
}

/// Builds a post-hoc pairwise table
///
/// Emits k·(k−1)/2 rows per variable, variables in input order, pairs in
/// group order. Stars are computed on the Holm-corrected p-value.
pub fn pairwise_table(
    table: &SurveyTable,
    group_column: &str,
    variables: &[&str],
) -> Result<Vec<PairwiseRow>> {
    let mut rows = Vec::new();
    for &variable in variables {
        let groups = grouped(table, group_column, variable)?;
        let comparisons = pairwise_welch(&groups).map_err(|e| stat_error(variable, e))?;

        for comparison in comparisons {
            rows.push(PairwiseRow {
                variable: variable.to_string(),
                group_a: comparison.group_a,
                group_b: comparison.group_b,
                mean_a: format_descriptive(comparison.mean_a),
                mean_b: format_descriptive(comparison.mean_b),
                t: format_stat(comparison.t),
                df: format_df(comparison.df),
                p_uncorrected: format_p(comparison.p_uncorrected),
                p_corrected: format_p(comparison.p_corrected),
                cohen_d: format_stat(comparison.cohen_d),
                stars: significance_stars(comparison.p_corrected).to_string(),
            });
        }
    }
    Ok(rows)
}

/// Formats result rows as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `rows` - Result rows of any table family
/// * `title` - Optional title printed above the table
pub fn format_result_table<T: Tabled>(rows: &[T], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No results available".to_string();
    }

    let table = Table::new(rows).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
    } else {
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SurveyTable;

    const TWO_GROUP_CSV: &str = "\
Group,Q1,Q2,Age
,,,
EE,5,6,21
EE,6,7,22
EE,4,5,23
EE,7,6,22
CG,3,2,24
CG,2,3,25
CG,4,4,23
CG,3,2,26
";

    const THREE_GROUP_CSV: &str = "\
Cohort,Score
,
A,1
A,2
A,3
B,2
B,3
B,4
C,5
C,6
C,7
";

    fn two_group_table() -> SurveyTable {
        SurveyTable::from_reader(TWO_GROUP_CSV.as_bytes()).unwrap()
    }

    fn three_group_table() -> SurveyTable {
        SurveyTable::from_reader(THREE_GROUP_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_t_test_table_row_per_variable_in_order() {
        let table = two_group_table();
        let rows =
            t_test_table(&table, "Group", &["Q2", "Q1", "Age"], TTestKind::Student).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].variable, "Q2");
        assert_eq!(rows[1].variable, "Q1");
        assert_eq!(rows[2].variable, "Age");
        assert_eq!(rows[0].n_a, 4);
        assert_eq!(rows[0].n_b, 4);
    }

    #[test]
    fn test_mann_whitney_table_reports_medians() {
        let table = two_group_table();
        let rows = mann_whitney_table(&table, "Group", &["Q1"]).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].median_a, "5.50");
        assert_eq!(rows[0].median_b, "3.00");
    }

    #[test]
    fn test_levene_table_flags_equal_variances() {
        let table = two_group_table();
        let rows = levene_table(&table, "Group", &["Q1"]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].equal_variances, "yes");
    }

    #[test]
    fn test_anova_tables_row_per_variable() {
        let table = three_group_table();
        let anova_rows = anova_table(&table, "Cohort", &["Score"]).unwrap();
        let welch_rows = welch_anova_table(&table, "Cohort", &["Score"]).unwrap();

        assert_eq!(anova_rows.len(), 1);
        assert_eq!(welch_rows.len(), 1);
        assert_eq!(anova_rows[0].df_between, "2");
        assert_eq!(anova_rows[0].df_within, "6");
    }

    #[test]
    fn test_pairwise_table_rows_per_pair() {
        let table = three_group_table();
        let rows = pairwise_table(&table, "Cohort", &["Score"]).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].group_a, "A");
        assert_eq!(rows[0].group_b, "B");
        assert_eq!(rows[2].group_a, "B");
        assert_eq!(rows[2].group_b, "C");
    }

    #[test]
    fn test_two_group_test_rejects_three_groups() {
        let table = three_group_table();
        let result = t_test_table(&table, "Cohort", &["Score"], TTestKind::Student);
        assert!(matches!(
            result,
            Err(CompareError::TwoGroupsRequired { got: 3 })
        ));
    }

    #[test]
    fn test_error_names_the_variable() {
        // Constant column makes the t-test degenerate
        let csv = "\
Group,Const
,
EE,1
EE,1
CG,1
CG,1
";
        let degenerate = SurveyTable::from_reader(csv.as_bytes()).unwrap();
        let result = t_test_table(&degenerate, "Group", &["Const"], TTestKind::Student);
        match result {
            Err(CompareError::Stat { variable, .. }) => assert_eq!(variable, "Const"),
            other => panic!("expected Stat error, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_format_result_table_with_title() {
        let table = two_group_table();
        let rows = t_test_table(&table, "Group", &["Q1"], TTestKind::Student).unwrap();
        let rendered = format_result_table(&rows, Some("Demographics"));

        assert!(rendered.contains("Demographics"));
        assert!(rendered.contains("Variable"));
        assert!(rendered.contains("Cohen d"));
        assert!(rendered.contains("Q1"));
    }

    #[test]
    fn test_format_result_table_empty() {
        let rows: Vec<TTestRow> = Vec::new();
        assert_eq!(format_result_table(&rows, None), "No results available");
    }
}
