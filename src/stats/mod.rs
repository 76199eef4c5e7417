//! Statistical comparison primitives
//!
//! This module contains the test families used by the survey comparison
//! tables:
//! - Variance equality ([`levene`])
//! - Two-group location tests ([`ttest`], [`mann_whitney`])
//! - Multi-group tests ([`anova`])
//! - Post-hoc pairwise tests ([`posthoc`])
//!
//! plus the shared p-value significance mapping ([`significance`]) and
//! descriptive helpers ([`describe`]).

pub mod anova;
pub mod describe;
pub mod levene;
pub mod mann_whitney;
pub mod posthoc;
pub mod significance;
pub mod ttest;

use thiserror::Error;

// Re-export the result types for convenience
pub use anova::{one_way_anova, welch_anova, AnovaResult, WelchAnovaResult};
pub use levene::{levene, LeveneResult};
pub use mann_whitney::{mann_whitney_u, MannWhitneyResult};
pub use posthoc::{holm_correction, pairwise_welch, PairwiseComparison};
pub use significance::significance_stars;
pub use ttest::{t_test, TTestKind, TTestResult};

/// Errors that can occur while computing a statistical test
#[derive(Error, Debug)]
pub enum StatError {
    #[error("Sample is empty")]
    EmptySample,

    #[error("Need at least {needed} observations per group, got {got}")]
    TooFewObservations { needed: usize, got: usize },

    #[error("Need at least {needed} groups, got {got}")]
    TooFewGroups { needed: usize, got: usize },

    #[error("Observations are constant; the test statistic is undefined")]
    ZeroVariance,

    #[error("Failed to construct distribution: {0}")]
    Distribution(String),
}

type Result<T> = core::result::Result<T, StatError>;

/// Verifies that every group carries at least `needed` observations
pub(crate) fn check_groups(groups: &[&[f64]], needed: usize) -> Result<()> {
    if groups.len() < 2 {
        return Err(StatError::TooFewGroups {
            needed: 2,
            got: groups.len(),
        });
    }
    for group in groups {
        if group.len() < needed {
            return Err(StatError::TooFewObservations {
                needed,
                got: group.len(),
            });
        }
    }
    Ok(())
}
