//! Allocation-weighted stress testing against named market shocks.
//!
//! A scenario's impact is the dot product of the normalized allocation with
//! the scenario's per-asset-class percentage shocks. Scenarios can instead
//! carry a fixed impact that ignores the allocation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::stats::{is_effectively_zero, round2};

/// Asset class categories shared by allocations and shocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Stocks,
    Bonds,
    Gold,
    Cash,
    Alternatives,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Gold,
        AssetClass::Cash,
        AssetClass::Alternatives,
    ];
}

/// Percentage weights per asset class. They are normalized by their sum and
/// need not add up to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationWeights {
    pub stocks: f64,
    pub bonds: f64,
    pub gold: f64,
    pub cash: f64,
    pub alternatives: f64,
}

impl AllocationWeights {
    #[must_use]
    pub fn new(stocks: f64, bonds: f64, gold: f64, cash: f64, alternatives: f64) -> Self {
        Self {
            stocks,
            bonds,
            gold,
            cash,
            alternatives,
        }
    }

    #[must_use]
    pub fn weight(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stocks => self.stocks,
            AssetClass::Bonds => self.bonds,
            AssetClass::Gold => self.gold,
            AssetClass::Cash => self.cash,
            AssetClass::Alternatives => self.alternatives,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        AssetClass::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}

/// A named market shock: percentage change per asset class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockVector {
    pub name: String,
    pub description: String,
    pub stocks: f64,
    pub bonds: f64,
    pub gold: f64,
    pub cash: f64,
    pub alternatives: f64,
    /// Historical months to recover, reported as-is
    pub recovery_months: u32,
    /// When set, the scenario reports this impact regardless of allocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_impact: Option<f64>,
}

impl ShockVector {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_shock(mut self, class: AssetClass, pct_change: f64) -> Self {
        match class {
            AssetClass::Stocks => self.stocks = pct_change,
            AssetClass::Bonds => self.bonds = pct_change,
            AssetClass::Gold => self.gold = pct_change,
            AssetClass::Cash => self.cash = pct_change,
            AssetClass::Alternatives => self.alternatives = pct_change,
        }
        self
    }

    #[must_use]
    pub fn with_recovery_months(mut self, months: u32) -> Self {
        self.recovery_months = months;
        self
    }

    #[must_use]
    pub fn with_fixed_impact(mut self, impact_pct: f64) -> Self {
        self.fixed_impact = Some(impact_pct);
        self
    }

    #[must_use]
    pub fn shock(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stocks => self.stocks,
            AssetClass::Bonds => self.bonds,
            AssetClass::Gold => self.gold,
            AssetClass::Cash => self.cash,
            AssetClass::Alternatives => self.alternatives,
        }
    }
}

/// Impact of one scenario on the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenario: String,
    pub description: String,
    /// Percentage change of the whole portfolio, rounded to 2 decimals
    pub portfolio_impact: f64,
    /// Post-shock value rounded to a whole unit
    pub estimated_value: f64,
    /// Months to recover, from the scenario definition
    pub recovery_time: u32,
}

/// Allocation-weighted impact of `shock` in percent, rounded to 2 decimals.
///
/// Returns 0 when the allocation sums to zero, fixed-impact scenarios
/// included. Otherwise a scenario's fixed impact takes precedence.
#[must_use]
pub fn portfolio_impact(allocation: &AllocationWeights, shock: &ShockVector) -> f64 {
    let total = allocation.total();
    if is_effectively_zero(total) {
        return 0.0;
    }

    if let Some(fixed) = shock.fixed_impact {
        return round2(fixed);
    }

    let impact: f64 = AssetClass::ALL
        .iter()
        .map(|c| allocation.weight(*c) / total * shock.shock(*c))
        .sum();
    round2(impact)
}

/// Run every scenario in `shocks` against the allocation.
///
/// `current_value` must be finite and greater than zero.
pub fn run_stress_tests(
    current_value: f64,
    allocation: &AllocationWeights,
    shocks: &[ShockVector],
) -> Result<Vec<StressTestResult>, ValidationError> {
    if !current_value.is_finite() || current_value <= 0.0 {
        return Err(ValidationError::InvalidParameter {
            name: "current_value",
            value: current_value,
            reason: "must be a finite value greater than zero",
        });
    }

    let results = shocks
        .iter()
        .map(|shock| {
            let impact = portfolio_impact(allocation, shock);
            let estimated_value = (current_value * (1.0 + impact / 100.0)).round();
            debug!(scenario = %shock.name, impact, estimated_value, "stress scenario evaluated");

            StressTestResult {
                scenario: shock.name.clone(),
                description: shock.description.clone(),
                portfolio_impact: impact,
                estimated_value,
                recovery_time: shock.recovery_months,
            }
        })
        .collect();
    Ok(results)
}

/// Built-in scenario library.
///
/// "Currency Crisis" carries a fixed -15% impact instead of per-class
/// shocks; it is not derived from the allocation.
#[must_use]
pub fn default_shock_library() -> Vec<ShockVector> {
    use AssetClass::*;

    vec![
        ShockVector::new(
            "2008 Financial Crisis",
            "Global credit crunch triggered by the US subprime collapse",
        )
        .with_shock(Stocks, -50.0)
        .with_shock(Bonds, 5.0)
        .with_shock(Gold, 25.0)
        .with_shock(Alternatives, -30.0)
        .with_recovery_months(48),
        ShockVector::new(
            "COVID-19 Crash",
            "Pandemic lockdowns and a sharp liquidity-driven selloff",
        )
        .with_shock(Stocks, -35.0)
        .with_shock(Bonds, 3.0)
        .with_shock(Gold, 5.0)
        .with_shock(Alternatives, -20.0)
        .with_recovery_months(6),
        ShockVector::new(
            "Dot-com Bubble",
            "Collapse of technology valuations from 2000 to 2002",
        )
        .with_shock(Stocks, -45.0)
        .with_shock(Bonds, 10.0)
        .with_shock(Gold, 12.0)
        .with_shock(Alternatives, -15.0)
        .with_recovery_months(84),
        ShockVector::new(
            "Interest Rate Shock",
            "Rapid central bank tightening repricing both stocks and bonds",
        )
        .with_shock(Stocks, -15.0)
        .with_shock(Bonds, -12.0)
        .with_shock(Gold, -5.0)
        .with_shock(Cash, 1.0)
        .with_shock(Alternatives, -10.0)
        .with_recovery_months(18),
        ShockVector::new(
            "Stagflation",
            "High inflation with stalled growth, as in the 1970s",
        )
        .with_shock(Stocks, -25.0)
        .with_shock(Bonds, -15.0)
        .with_shock(Gold, 30.0)
        .with_shock(Cash, -2.0)
        .with_shock(Alternatives, 5.0)
        .with_recovery_months(36),
        ShockVector::new(
            "Currency Crisis",
            "Sharp depreciation of the home currency and capital flight",
        )
        .with_fixed_impact(-15.0)
        .with_recovery_months(24),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_accessors() {
        let allocation = AllocationWeights::new(60.0, 30.0, 5.0, 5.0, 0.0);
        assert_eq!(allocation.total(), 100.0);
        assert_eq!(allocation.weight(AssetClass::Bonds), 30.0);
    }

    #[test]
    fn test_with_shock_sets_single_class() {
        let shock = ShockVector::new("X", "").with_shock(AssetClass::Gold, 12.5);
        assert_eq!(shock.shock(AssetClass::Gold), 12.5);
        assert_eq!(shock.shock(AssetClass::Stocks), 0.0);
        assert_eq!(shock.fixed_impact, None);
    }

    #[test]
    fn test_weights_are_normalized() {
        // 2:2 is the same allocation as 50:50
        let shock = ShockVector::new("X", "")
            .with_shock(AssetClass::Stocks, -40.0)
            .with_shock(AssetClass::Bonds, 10.0);
        let a = portfolio_impact(&AllocationWeights::new(2.0, 2.0, 0.0, 0.0, 0.0), &shock);
        let b = portfolio_impact(&AllocationWeights::new(50.0, 50.0, 0.0, 0.0, 0.0), &shock);
        assert_eq!(a, -15.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_impact_rounded_to_two_decimals() {
        let shock = ShockVector::new("X", "").with_shock(AssetClass::Stocks, -10.0);
        // 1/3 * -10 = -3.333...
        let impact = portfolio_impact(&AllocationWeights::new(1.0, 1.0, 1.0, 0.0, 0.0), &shock);
        assert_eq!(impact, -3.33);
    }

    #[test]
    fn test_fixed_impact_ignores_allocation() {
        let shock = ShockVector::new("Y", "").with_fixed_impact(-15.0);
        assert_eq!(
            portfolio_impact(&AllocationWeights::new(0.0, 100.0, 0.0, 0.0, 0.0), &shock),
            -15.0
        );
        assert_eq!(portfolio_impact(&AllocationWeights::default(), &shock), 0.0);
    }

    #[test]
    fn test_rejects_non_positive_current_value() {
        let allocation = AllocationWeights::new(100.0, 0.0, 0.0, 0.0, 0.0);
        let library = default_shock_library();

        for current_value in [0.0, -500.0, f64::NAN, f64::INFINITY] {
            let err = run_stress_tests(current_value, &allocation, &library).unwrap_err();
            assert!(matches!(
                err,
                ValidationError::InvalidParameter {
                    name: "current_value",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_default_library() {
        let library = default_shock_library();
        assert_eq!(library.len(), 6);

        let currency = library.iter().find(|s| s.name == "Currency Crisis").unwrap();
        assert_eq!(currency.fixed_impact, Some(-15.0));
        assert!(
            library
                .iter()
                .filter(|s| s.name != "Currency Crisis")
                .all(|s| s.fixed_impact.is_none())
        );
    }
}
