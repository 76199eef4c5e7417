//! Post-hoc pairwise comparisons
//!
//! After a significant omnibus test, every pair of groups is compared
//! with a Welch t-test; p-values are adjusted across the pairs of one
//! variable with the Holm-Bonferroni step-down procedure.

use super::describe::mean;
use super::ttest::{t_test, TTestKind};
use super::{Result, StatError};
use crate::table::GroupScores;

/// One pairwise comparison between two groups
#[derive(Debug, Clone)]
pub struct PairwiseComparison {
    /// First group label
    pub group_a: String,
    /// Second group label
    pub group_b: String,
    /// Mean of the first group
    pub mean_a: f64,
    /// Mean of the second group
    pub mean_b: f64,
    /// Welch t statistic
    pub t: f64,
    /// Welch-Satterthwaite degrees of freedom
    pub df: f64,
    /// Uncorrected two-sided p-value
    pub p_uncorrected: f64,
    /// Holm-Bonferroni corrected p-value
    pub p_corrected: f64,
    /// Cohen's d
    pub cohen_d: f64,
}

/// Runs Welch t-tests for every unordered pair of groups
///
/// Pairs follow the order of `groups` (i < j). Corrected p-values are
/// Holm-Bonferroni adjusted across all pairs of this call.
///
/// # Arguments
/// * `groups` - Labeled score lists, one per group (≥2 groups, ≥2 values each)
///
/// # Returns
/// * `Ok(Vec<PairwiseComparison>)` - k·(k−1)/2 comparisons
/// * `Err(StatError)` - If any group is degenerate
pub fn pairwise_welch(groups: &[GroupScores]) -> Result<Vec<PairwiseComparison>> {
    if groups.len() < 2 {
        return Err(StatError::TooFewGroups {
            needed: 2,
            got: groups.len(),
        });
    }

    let mut comparisons = Vec::new();
    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            let a = &groups[i];
            let b = &groups[j];
            let outcome = t_test(&a.values, &b.values, TTestKind::Welch)?;

            comparisons.push(PairwiseComparison {
                group_a: a.group.clone(),
                group_b: b.group.clone(),
                mean_a: mean(&a.values)?,
                mean_b: mean(&b.values)?,
                t: outcome.t,
                df: outcome.df,
                p_uncorrected: outcome.p_value,
                p_corrected: 0.0,
                cohen_d: outcome.cohen_d,
            });
        }
    }

    let uncorrected: Vec<f64> = comparisons.iter().map(|c| c.p_uncorrected).collect();
    let corrected = holm_correction(&uncorrected);
    for (comparison, p) in comparisons.iter_mut().zip(corrected) {
        comparison.p_corrected = p;
    }

    Ok(comparisons)
}

/// Holm-Bonferroni step-down correction
///
/// Sorts the p-values ascending, multiplies the i-th smallest by
/// (m − i), enforces monotonicity along the sorted sequence, clamps to 1
/// and returns the adjusted values in the original order.
pub fn holm_correction(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    if m == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; m];
    let mut running_max = 0.0_f64;
    for (sorted_index, &original_index) in order.iter().enumerate() {
        let scaled = ((m - sorted_index) as f64 * p_values[original_index]).min(1.0);
        running_max = running_max.max(scaled);
        adjusted[original_index] = running_max;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(group: &str, values: &[f64]) -> GroupScores {
        GroupScores {
            group: group.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_pairwise_count_and_order() {
        let groups = vec![
            scores("A", &[1.0, 2.0, 3.0]),
            scores("B", &[2.0, 3.0, 4.0]),
            scores("C", &[5.0, 6.0, 7.0]),
        ];
        let comparisons = pairwise_welch(&groups).unwrap();

        assert_eq!(comparisons.len(), 3);
        assert_eq!(
            (comparisons[0].group_a.as_str(), comparisons[0].group_b.as_str()),
            ("A", "B")
        );
        assert_eq!(
            (comparisons[1].group_a.as_str(), comparisons[1].group_b.as_str()),
            ("A", "C")
        );
        assert_eq!(
            (comparisons[2].group_a.as_str(), comparisons[2].group_b.as_str()),
            ("B", "C")
        );
    }

    #[test]
    fn test_corrected_never_below_uncorrected() {
        let groups = vec![
            scores("A", &[1.0, 2.0, 3.0, 4.0]),
            scores("B", &[3.0, 4.0, 5.0, 6.0]),
            scores("C", &[5.0, 6.0, 7.0, 8.0]),
        ];
        for comparison in pairwise_welch(&groups).unwrap() {
            assert!(comparison.p_corrected >= comparison.p_uncorrected);
            assert!(comparison.p_corrected <= 1.0);
        }
    }

    #[test]
    fn test_holm_correction_known_values() {
        // Sorted: 0.01*3 = 0.03, 0.02*2 = 0.04, 0.05*1 = 0.05
        let adjusted = holm_correction(&[0.02, 0.05, 0.01]);
        assert!((adjusted[2] - 0.03).abs() < 1e-12);
        assert!((adjusted[0] - 0.04).abs() < 1e-12);
        assert!((adjusted[1] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_holm_correction_is_monotone_and_clamped() {
        let adjusted = holm_correction(&[0.9, 0.8, 0.7]);
        assert!(adjusted.iter().all(|&p| p <= 1.0));

        // A larger raw p never receives a smaller adjusted p
        let raw = [0.04, 0.01, 0.03, 0.002];
        let adjusted = holm_correction(&raw);
        let mut pairs: Vec<(f64, f64)> = raw.iter().copied().zip(adjusted).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for window in pairs.windows(2) {
            assert!(window[0].1 <= window[1].1);
        }
    }

    #[test]
    fn test_holm_correction_empty() {
        assert!(holm_correction(&[]).is_empty());
    }
}
