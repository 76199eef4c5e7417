//! Mann-Whitney U test for two independent samples
//!
//! The non-parametric counterpart of the two-sample t-test, used for the
//! ordinal Likert variables. P-values come from the tie-corrected normal
//! approximation with continuity correction; the effect size is the
//! rank-biserial correlation.

use super::describe::midranks;
use super::{check_groups, Result, StatError};
use statrs::distribution::{ContinuousCDF, Normal};

/// Outcome of a Mann-Whitney U test
#[derive(Debug, Clone, Copy)]
pub struct MannWhitneyResult {
    /// The U statistic of the first sample
    pub u: f64,
    /// Standardized statistic under the normal approximation
    pub z: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Rank-biserial correlation, positive when the first sample tends larger
    pub rank_biserial: f64,
}

/// Runs a Mann-Whitney U test on two independent samples
///
/// Ranks the pooled observations with midranks, computes U of the first
/// sample, and evaluates the tie-corrected normal approximation with
/// continuity correction. When every pooled observation is identical the
/// test degenerates to p = 1 with a zero effect size.
///
/// # Arguments
/// * `a` - First sample (≥2 observations)
/// * `b` - Second sample (≥2 observations)
///
/// # Returns
/// * `Ok(MannWhitneyResult)` - U, z, p-value, rank-biserial correlation
/// * `Err(StatError)` - If a sample is too small
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Result<MannWhitneyResult> {
    check_groups(&[a, b], 2)?;

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let n_total = a.len() + b.len();

    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    let ranks = midranks(&pooled);

    let rank_sum_a: f64 = ranks[..a.len()].iter().sum();
    let u = rank_sum_a - n1 * (n1 + 1.0) / 2.0;
    let mean_u = n1 * n2 / 2.0;

    // Tie correction over the pooled sample
    let tie_term: f64 = tie_run_lengths(&pooled)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t.powi(3) - t
        })
        .sum();
    let n = n_total as f64;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));

    let rank_biserial = 2.0 * u / (n1 * n2) - 1.0;

    if variance <= 0.0 {
        // Every pooled observation is tied
        return Ok(MannWhitneyResult {
            u,
            z: 0.0,
            p_value: 1.0,
            rank_biserial: 0.0,
        });
    }

    // Continuity correction shrinks the deviation toward zero
    let deviation = u - mean_u;
    let corrected = if deviation.abs() <= 0.5 {
        0.0
    } else {
        deviation - 0.5 * deviation.signum()
    };
    let z = corrected / variance.sqrt();

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| StatError::Distribution(format!("standard normal: {e}")))?;
    let p_value = (2.0 * (1.0 - normal.cdf(z.abs()))).min(1.0);

    Ok(MannWhitneyResult {
        u,
        z,
        p_value,
        rank_biserial,
    })
}

/// Lengths of tie runs in a sample (runs of length 1 included)
fn tie_run_lengths(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut runs = Vec::new();
    let mut index = 0;
    while index < sorted.len() {
        let mut end = index + 1;
        while end < sorted.len() && sorted[end] == sorted[index] {
            end += 1;
        }
        runs.push(end - index);
        index = end;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_separated_samples() {
        // a entirely below b: U = 0, maximal negative effect
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let result = mann_whitney_u(&a, &b).unwrap();

        assert_eq!(result.u, 0.0);
        assert!((result.rank_biserial + 1.0).abs() < 1e-12);
        // Normal approximation with continuity correction:
        // z = (0 - 4.5 + 0.5) / sqrt(5.25)
        assert!((result.z + 4.0 / 5.25_f64.sqrt()).abs() < 1e-12);
        assert!((result.p_value - 0.0809).abs() < 0.002);
    }

    #[test]
    fn test_symmetric_samples_have_zero_effect() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [1.0, 2.0, 3.0, 4.0];
        let result = mann_whitney_u(&a, &b).unwrap();

        assert!((result.u - 8.0).abs() < 1e-12);
        assert!(result.rank_biserial.abs() < 1e-12);
        assert!(result.p_value > 0.9);
    }

    #[test]
    fn test_all_tied_degenerates_to_p_one() {
        let a = [5.0, 5.0, 5.0];
        let b = [5.0, 5.0];
        let result = mann_whitney_u(&a, &b).unwrap();

        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.z, 0.0);
        assert_eq!(result.rank_biserial, 0.0);
    }

    #[test]
    fn test_tie_run_lengths() {
        assert_eq!(tie_run_lengths(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0]), vec![1, 2, 3]);
    }

    #[test]
    fn test_too_small_sample_is_rejected() {
        let a = [1.0];
        let b = [2.0, 3.0];
        assert!(matches!(
            mann_whitney_u(&a, &b),
            Err(StatError::TooFewObservations { .. })
        ));
    }
}
