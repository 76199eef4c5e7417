//! Levene's test for equality of group variances
//!
//! Used both as a standalone comparison and as the pre-test that decides
//! between the pooled and Welch variants of the t-test. Centers on the
//! group median (the Brown-Forsythe variant), which behaves better on
//! skewed ordinal data than mean centering.

use super::describe::{mean, median};
use super::{check_groups, Result, StatError};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Outcome of Levene's test
#[derive(Debug, Clone, Copy)]
pub struct LeveneResult {
    /// The W statistic
    pub w: f64,
    /// Numerator degrees of freedom (k − 1)
    pub df_between: f64,
    /// Denominator degrees of freedom (N − k)
    pub df_within: f64,
    /// Two-sided p-value from the F distribution
    pub p_value: f64,
}

impl LeveneResult {
    /// Whether the groups can be treated as having equal variances at `alpha`
    pub fn equal_variances(&self, alpha: f64) -> bool {
        self.p_value >= alpha
    }
}

/// Runs Levene's test (median-centered) across two or more groups
///
/// # Arguments
/// * `groups` - One slice of observations per group; each needs ≥2 values
///
/// # Returns
/// * `Ok(LeveneResult)` - W statistic and p-value
/// * `Err(StatError)` - If the input is degenerate
pub fn levene(groups: &[&[f64]]) -> Result<LeveneResult> {
    check_groups(groups, 2)?;

    let k = groups.len();
    let n_total: usize = groups.iter().map(|g| g.len()).sum();

    // Absolute deviations from the group median
    let mut deviations: Vec<Vec<f64>> = Vec::with_capacity(k);
    for group in groups {
        let center = median(group)?;
        deviations.push(group.iter().map(|x| (x - center).abs()).collect());
    }

    let deviation_means: Vec<f64> = deviations
        .iter()
        .map(|z| mean(z))
        .collect::<Result<Vec<f64>>>()?;
    let grand_mean = deviations.iter().flatten().sum::<f64>() / n_total as f64;

    let ss_between: f64 = deviations
        .iter()
        .zip(&deviation_means)
        .map(|(z, zbar)| z.len() as f64 * (zbar - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = deviations
        .iter()
        .zip(&deviation_means)
        .map(|(z, zbar)| z.iter().map(|v| (v - zbar).powi(2)).sum::<f64>())
        .sum();

    if ss_within == 0.0 {
        return Err(StatError::ZeroVariance);
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let w = (df_within / df_between) * (ss_between / ss_within);

    let f_dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| StatError::Distribution(format!("F({df_between}, {df_within}): {e}")))?;
    let p_value = 1.0 - f_dist.cdf(w);

    Ok(LeveneResult {
        w,
        df_between,
        df_within,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levene_known_value() {
        // Hand-computed: medians 3 and 6, deviation means 1.2 and 2.4,
        // SSB = 3.6, SSW = 14.0 => W = 8 * 3.6/14.0
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let result = levene(&[&a, &b]).unwrap();

        assert!((result.w - 8.0 * 3.6 / 14.0).abs() < 1e-12);
        assert_eq!(result.df_between, 1.0);
        assert_eq!(result.df_within, 8.0);
        assert!((result.p_value - 0.1895).abs() < 0.005);
    }

    #[test]
    fn test_levene_identical_spread_is_not_significant() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [11.0, 12.0, 13.0, 14.0, 15.0];
        let result = levene(&[&a, &b]).unwrap();

        assert!(result.w.abs() < 1e-12);
        assert!(result.p_value > 0.99);
        assert!(result.equal_variances(0.05));
    }

    #[test]
    fn test_levene_rejects_single_group() {
        let a = [1.0, 2.0, 3.0];
        assert!(matches!(
            levene(&[&a]),
            Err(StatError::TooFewGroups { .. })
        ));
    }

    #[test]
    fn test_levene_constant_groups_error() {
        let a = [2.0, 2.0, 2.0];
        let b = [5.0, 5.0, 5.0];
        assert!(matches!(levene(&[&a, &b]), Err(StatError::ZeroVariance)));
    }
}
