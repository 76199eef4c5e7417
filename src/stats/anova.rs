//! One-way ANOVA and Welch's ANOVA
//!
//! Multi-group comparisons for factors with three or more levels. The
//! classic one-way decomposition assumes equal group variances; Welch's
//! variant drops that assumption and is reported alongside it when a
//! Levene pre-test casts doubt on homogeneity.

use super::describe::{mean, sample_variance};
use super::{check_groups, Result, StatError};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Outcome of a classic one-way ANOVA
#[derive(Debug, Clone, Copy)]
pub struct AnovaResult {
    /// The F statistic
    pub f: f64,
    /// Numerator degrees of freedom (k − 1)
    pub df_between: f64,
    /// Denominator degrees of freedom (N − k)
    pub df_within: f64,
    /// P-value from the F distribution
    pub p_value: f64,
    /// Effect size eta-squared (SS_between / SS_total)
    pub eta_squared: f64,
}

/// Outcome of Welch's ANOVA
#[derive(Debug, Clone, Copy)]
pub struct WelchAnovaResult {
    /// The Welch F* statistic
    pub f: f64,
    /// Numerator degrees of freedom (k − 1)
    pub df_between: f64,
    /// Approximate denominator degrees of freedom
    pub df_within: f64,
    /// P-value from the F distribution
    pub p_value: f64,
    /// Effect size eta-squared from the classic decomposition
    pub eta_squared: f64,
}

/// Runs a classic one-way ANOVA across two or more groups
///
/// # Arguments
/// * `groups` - One slice of observations per group; each needs ≥2 values
///
/// # Returns
/// * `Ok(AnovaResult)` - F statistic, p-value, eta-squared
/// * `Err(StatError)` - If the input is degenerate
pub fn one_way_anova(groups: &[&[f64]]) -> Result<AnovaResult> {
    check_groups(groups, 2)?;

    let k = groups.len();
    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group)?;
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|x| (x - group_mean).powi(2)).sum::<f64>();
    }

    if ss_within == 0.0 {
        return Err(StatError::ZeroVariance);
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    let eta_squared = ss_between / (ss_between + ss_within);

    let f_dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| StatError::Distribution(format!("F({df_between}, {df_within}): {e}")))?;
    let p_value = 1.0 - f_dist.cdf(f);

    Ok(AnovaResult {
        f,
        df_between,
        df_within,
        p_value,
        eta_squared,
    })
}

/// Runs Welch's ANOVA across two or more groups
///
/// Weights each group by n/s², so unequal variances do not distort the
/// statistic. Degrees of freedom follow the Welch approximation.
///
/// # Arguments
/// * `groups` - One slice of observations per group; each needs ≥2 values
///   and a non-zero variance
///
/// # Returns
/// * `Ok(WelchAnovaResult)` - F* statistic, p-value, eta-squared
/// * `Err(StatError)` - If the input is degenerate
pub fn welch_anova(groups: &[&[f64]]) -> Result<WelchAnovaResult> {
    check_groups(groups, 2)?;

    let k = groups.len() as f64;

    let mut weights = Vec::with_capacity(groups.len());
    let mut means = Vec::with_capacity(groups.len());
    for group in groups {
        let variance = sample_variance(group)?;
        if variance == 0.0 {
            return Err(StatError::ZeroVariance);
        }
        weights.push(group.len() as f64 / variance);
        means.push(mean(group)?);
    }

    let weight_sum: f64 = weights.iter().sum();
    let weighted_mean: f64 = weights
        .iter()
        .zip(&means)
        .map(|(w, m)| w * m)
        .sum::<f64>()
        / weight_sum;

    let numerator: f64 = weights
        .iter()
        .zip(&means)
        .map(|(w, m)| w * (m - weighted_mean).powi(2))
        .sum::<f64>()
        / (k - 1.0);

    // Shared lambda term of the Welch denominator and df approximation
    let lambda: f64 = groups
        .iter()
        .zip(&weights)
        .map(|(group, w)| {
            (1.0 - w / weight_sum).powi(2) / (group.len() as f64 - 1.0)
        })
        .sum();

    let denominator = 1.0 + 2.0 * (k - 2.0) / (k * k - 1.0) * lambda;
    let f = numerator / denominator;

    let df_between = k - 1.0;
    let df_within = (k * k - 1.0) / (3.0 * lambda);

    let f_dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| StatError::Distribution(format!("F({df_between}, {df_within}): {e}")))?;
    let p_value = 1.0 - f_dist.cdf(f);

    // Classic decomposition still supplies the reported effect size
    let eta_squared = one_way_anova(groups)?.eta_squared;

    Ok(WelchAnovaResult {
        f,
        df_between,
        df_within,
        p_value,
        eta_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_groups() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            vec![1.0, 2.0, 3.0],
            vec![2.0, 3.0, 4.0],
            vec![3.0, 4.0, 5.0],
        )
    }

    #[test]
    fn test_one_way_anova_known_value() {
        // SSB = 6, SSW = 6, df = (2, 6) => F = 3, eta² = 0.5
        // With df1 = 2 the p-value has the closed form (1 + 2F/df2)^(-df2/2)
        let (a, b, c) = sample_groups();
        let result = one_way_anova(&[&a, &b, &c]).unwrap();

        assert!((result.f - 3.0).abs() < 1e-12);
        assert_eq!(result.df_between, 2.0);
        assert_eq!(result.df_within, 6.0);
        assert!((result.eta_squared - 0.5).abs() < 1e-12);
        assert!((result.p_value - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_welch_anova_known_value() {
        // Equal variances 1 and counts 3: weights 3 each,
        // numerator = 3, lambda = 2/3, denominator = 7/6, df2 = 4
        let (a, b, c) = sample_groups();
        let result = welch_anova(&[&a, &b, &c]).unwrap();

        assert!((result.f - 18.0 / 7.0).abs() < 1e-9);
        assert_eq!(result.df_between, 2.0);
        assert!((result.df_within - 4.0).abs() < 1e-9);
        // Closed form again: (1 + 2F/4)^(-2)
        let expected_p: f64 = (1.0_f64 + 18.0 / 14.0).powi(-2);
        assert!((result.p_value - expected_p).abs() < 1e-6);
    }

    #[test]
    fn test_anova_identical_groups_have_zero_f() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0, 3.0];
        let result = one_way_anova(&[&a, &b]).unwrap();

        assert!(result.f.abs() < 1e-12);
        assert!(result.p_value > 0.99);
    }

    #[test]
    fn test_anova_constant_groups_error() {
        let a = [2.0, 2.0];
        let b = [3.0, 3.0];
        assert!(matches!(
            one_way_anova(&[&a, &b]),
            Err(StatError::ZeroVariance)
        ));
        assert!(matches!(
            welch_anova(&[&a, &b]),
            Err(StatError::ZeroVariance)
        ));
    }

    #[test]
    fn test_anova_rejects_single_group() {
        let a = [1.0, 2.0, 3.0];
        assert!(matches!(
            one_way_anova(&[&a]),
            Err(StatError::TooFewGroups { .. })
        ));
    }
}
