//! Analysis request file.
//!
//! A request is a YAML document with one optional section per engine:
//!
//! ```yaml
//! returns:
//!   portfolio: [0.012, -0.004, 0.007]
//!   benchmark: [0.010, -0.002, 0.005]
//!   risk_free_rate: 6.5        # annual, percent
//! simulation:
//!   current_value: 1000000.0
//!   expected_return: 0.12
//!   volatility: 0.18
//!   time_horizon: 10
//! stress:
//!   current_value: 1000000.0
//!   allocation: { stocks: 60.0, bonds: 30.0, gold: 5.0, cash: 5.0 }
//!   # scenarios: [...]         # defaults to the built-in library
//! factors:
//!   market: [0.010, -0.002, 0.005]
//! ```

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use riskscope_core::{
    AllocationWeights, FactorReturns, ShockVector, SimulationConfig, default_shock_library,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    pub returns: Option<ReturnsInput>,
    pub simulation: Option<SimulationConfig>,
    pub stress: Option<StressInput>,
    pub factors: Option<FactorsInput>,
}

/// Aligned historical returns for attribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnsInput {
    pub portfolio: Vec<f64>,
    pub benchmark: Vec<f64>,
    /// Annual risk-free rate in percent
    pub risk_free_rate: f64,
}

/// Portfolio to stress. `current_value` and `allocation` are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StressInput {
    pub current_value: f64,
    pub allocation: AllocationWeights,
    /// Custom scenarios; the built-in library is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<ShockVector>>,
}

impl StressInput {
    #[must_use]
    pub fn shock_library(&self) -> Vec<ShockVector> {
        self.scenarios.clone().unwrap_or_else(default_shock_library)
    }
}

/// Factor series. `portfolio` falls back to `returns.portfolio` when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorsInput {
    pub portfolio: Vec<f64>,
    pub market: Vec<f64>,
    pub size: Vec<f64>,
    pub value: Vec<f64>,
    pub momentum: Vec<f64>,
}

impl FactorsInput {
    #[must_use]
    pub fn factor_returns(&self) -> FactorReturns {
        FactorReturns {
            market: self.market.clone(),
            size: self.size.clone(),
            value: self.value.clone(),
            momentum: self.momentum.clone(),
        }
    }
}

impl AnalysisRequest {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Read and parse a request file
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read request file {}", path.display()))?;
        let request = Self::from_yaml(&content)
            .map_err(|e| eyre!("failed to parse request file {}: {e}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            returns = request.returns.is_some(),
            simulation = request.simulation.is_some(),
            stress = request.stress.is_some(),
            factors = request.factors.is_some(),
            "loaded analysis request"
        );
        Ok(request)
    }

    /// True when the request has no section at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.returns.is_none()
            && self.simulation.is_none()
            && self.stress.is_none()
            && self.factors.is_none()
    }
}
