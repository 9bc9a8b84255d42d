//! Factor attribution.
//!
//! The decomposition is a fixed illustrative split, not a regression on the
//! supplied series. Every row is marked `statistically_derived: false` so
//! callers can label it accordingly. A real implementation would regress the
//! portfolio on the market, size, value and momentum factor series.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Factor return series aligned with the portfolio's returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorReturns {
    pub market: Vec<f64>,
    pub size: Vec<f64>,
    pub value: Vec<f64>,
    pub momentum: Vec<f64>,
}

/// Share of portfolio return attributed to one factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAttribution {
    pub factor: String,
    /// Percent of total return
    pub contribution_pct: f64,
    pub description: String,
    /// False while the split is illustrative
    pub statistically_derived: bool,
}

const ILLUSTRATIVE_SPLIT: [(&str, f64, &str); 5] = [
    ("Market Beta", 65.0, "Exposure to broad market movements"),
    ("Size", 10.0, "Small-cap versus large-cap tilt"),
    ("Value", 15.0, "Value versus growth tilt"),
    ("Momentum", 5.0, "Exposure to recent winners"),
    ("Alpha", 5.0, "Return not explained by the factors"),
];

/// Decompose portfolio returns into factor contributions.
///
/// Returns the fixed split Market Beta 65%, Size 10%, Value 15%,
/// Momentum 5%, Alpha 5% whatever the inputs are.
#[must_use]
pub fn decompose_factors(portfolio: &[f64], factors: &FactorReturns) -> Vec<FactorAttribution> {
    warn!(
        periods = portfolio.len(),
        market_periods = factors.market.len(),
        "factor decomposition is illustrative, not regression-derived"
    );

    ILLUSTRATIVE_SPLIT
        .iter()
        .map(|(factor, contribution_pct, description)| FactorAttribution {
            factor: (*factor).to_string(),
            contribution_pct: *contribution_pct,
            description: (*description).to_string(),
            statistically_derived: false,
        })
        .collect()
}
