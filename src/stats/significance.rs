//! Significance-level annotation for p-values
//!
//! Maps p-values onto the star notation used in the result tables of the
//! study. The mapping is a pure step function with exclusive-lower /
//! inclusive-upper boundaries.

/// Maps a p-value onto its significance marker
///
/// * `p ≤ 0.001` → `"***"`
/// * `0.001 < p ≤ 0.01` → `"**"`
/// * `0.01 < p ≤ 0.05` → `"*"`
/// * otherwise → `"ns"`
///
/// NaN p-values fall through every comparison and map to `"ns"`.
pub fn significance_stars(p: f64) -> &'static str {
    if p <= 0.001 {
        "***"
    } else if p <= 0.01 {
        "**"
    } else if p <= 0.05 {
        "*"
    } else {
        "ns"
    }
}
