//! Descriptive statistics shared by the test families

use super::{Result, StatError};

/// Arithmetic mean of a sample
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance (n − 1 denominator)
pub fn sample_variance(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(StatError::TooFewObservations {
            needed: 2,
            got: values.len(),
        });
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Ok(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64> {
    Ok(sample_variance(values)?.sqrt())
}

/// Median of a sample
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatError::EmptySample);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Assigns midranks to a sample
///
/// Returns the rank of each value in its original position, starting at 1.
/// Tied values receive the average of the ranks they span, the convention
/// rank-based tests expect.
pub fn midranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut index = 0;
    while index < order.len() {
        // Find the extent of the tie run starting at `index`
        let mut end = index + 1;
        while end < order.len() && values[order[end]] == values[order[index]] {
            end += 1;
        }
        // Average rank across the run (ranks are 1-based)
        let rank = (index + 1 + end) as f64 / 2.0;
        for &position in &order[index..end] {
            ranks[position] = rank;
        }
        index = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 3.0);
        assert!(matches!(mean(&[]), Err(StatError::EmptySample)));
    }

    #[test]
    fn test_sample_variance() {
        // Var{1..5} = 2.5 with the n-1 denominator
        assert_eq!(sample_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 2.5);
        assert!(matches!(
            sample_variance(&[1.0]),
            Err(StatError::TooFewObservations { .. })
        ));
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_midranks_without_ties() {
        let ranks = midranks(&[10.0, 30.0, 20.0]);
        assert_eq!(ranks, vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_midranks_with_ties() {
        // The two 2.0s span ranks 2 and 3 and both receive 2.5
        let ranks = midranks(&[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }
}
