//! Independent two-sample t-tests
//!
//! Provides the pooled (Student) and unequal-variance (Welch) variants,
//! plus an automatic mode that picks between them with a Levene pre-test.
//! Effect size is Cohen's d with the pooled standard deviation.

use super::describe::{mean, sample_variance};
use super::levene::levene;
use super::{Result, StatError};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Which t-test variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTestKind {
    /// Pooled-variance Student's t-test
    Student,
    /// Welch's t-test with Satterthwaite degrees of freedom
    Welch,
    /// Levene pre-test at α = 0.05 decides between Student and Welch
    Auto,
}

/// Outcome of an independent two-sample t-test
#[derive(Debug, Clone, Copy)]
pub struct TTestResult {
    /// The t statistic (first sample minus second sample)
    pub t: f64,
    /// Degrees of freedom (integer for Student, fractional for Welch)
    pub df: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Cohen's d with the pooled standard deviation
    pub cohen_d: f64,
    /// Variant that was actually run (relevant for [`TTestKind::Auto`])
    pub kind: TTestKind,
}

/// Runs an independent two-sample t-test
///
/// # Arguments
/// * `a` - First sample (≥2 observations)
/// * `b` - Second sample (≥2 observations)
/// * `kind` - Variant selection; [`TTestKind::Auto`] runs a Levene
///   pre-test and switches to Welch when variances differ at α = 0.05
///
/// # Returns
/// * `Ok(TTestResult)` - Statistic, degrees of freedom, p-value, effect size
/// * `Err(StatError)` - If a sample is too small or has no variance
pub fn t_test(a: &[f64], b: &[f64], kind: TTestKind) -> Result<TTestResult> {
    let kind = match kind {
        TTestKind::Auto => match levene(&[a, b]) {
            Ok(pre_test) if !pre_test.equal_variances(0.05) => TTestKind::Welch,
            _ => TTestKind::Student,
        },
        other => other,
    };

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean1 = mean(a)?;
    let mean2 = mean(b)?;
    let var1 = sample_variance(a)?;
    let var2 = sample_variance(b)?;

    let (df, standard_error) = if kind == TTestKind::Welch {
        let se = (var1 / n1 + var2 / n2).sqrt();
        // Welch-Satterthwaite degrees of freedom
        let df = (var1 / n1 + var2 / n2).powi(2)
            / ((var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0));
        (df, se)
    } else {
        let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
        let se = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
        (n1 + n2 - 2.0, se)
    };

    if standard_error == 0.0 {
        return Err(StatError::ZeroVariance);
    }
    let t = (mean1 - mean2) / standard_error;

    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatError::Distribution(format!("t({df}): {e}")))?;
    let p_value = 2.0 * (1.0 - t_dist.cdf(t.abs()));

    // Pooled-SD effect size regardless of which statistic was used
    let pooled_sd = (((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0)).sqrt();
    let cohen_d = (mean1 - mean2) / pooled_sd;

    Ok(TTestResult {
        t,
        df,
        p_value,
        cohen_d,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_known_value() {
        // Means 3 and 4, equal variances 2.5 => t = -1 exactly, df = 8
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let result = t_test(&a, &b, TTestKind::Student).unwrap();

        assert!((result.t + 1.0).abs() < 1e-12);
        assert_eq!(result.df, 8.0);
        assert!((result.p_value - 0.3466).abs() < 0.002);
        assert!((result.cohen_d + 1.0 / 2.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(result.kind, TTestKind::Student);
    }

    #[test]
    fn test_welch_equals_student_for_equal_variances() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let student = t_test(&a, &b, TTestKind::Student).unwrap();
        let welch = t_test(&a, &b, TTestKind::Welch).unwrap();

        // Same t and df when variances are equal
        assert!((student.t - welch.t).abs() < 1e-12);
        assert!((student.df - welch.df).abs() < 1e-9);
    }

    #[test]
    fn test_auto_picks_student_for_similar_spread() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [11.0, 12.0, 13.0, 14.0, 15.0];
        let result = t_test(&a, &b, TTestKind::Auto).unwrap();
        assert_eq!(result.kind, TTestKind::Student);
    }

    #[test]
    fn test_zero_variance_is_rejected() {
        let a = [3.0, 3.0, 3.0];
        let b = [3.0, 3.0, 3.0];
        assert!(matches!(
            t_test(&a, &b, TTestKind::Student),
            Err(StatError::ZeroVariance)
        ));
    }

    #[test]
    fn test_too_small_sample_is_rejected() {
        let a = [1.0];
        let b = [2.0, 3.0];
        assert!(matches!(
            t_test(&a, &b, TTestKind::Welch),
            Err(StatError::TooFewObservations { .. })
        ));
    }
}
