use std::fmt;

/// Errors raised when engine inputs violate their preconditions
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Portfolio and benchmark return series must be aligned period by period
    LengthMismatch { portfolio: usize, benchmark: usize },
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::LengthMismatch {
                portfolio,
                benchmark,
            } => write!(
                f,
                "mismatched series length: portfolio has {portfolio} returns, benchmark has {benchmark}"
            ),
            ValidationError::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid {name} ({value}): {reason}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from running a Monte Carlo simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Validation(ValidationError),
    /// Monte Carlo simulation was cancelled by the caller
    Cancelled,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Validation(e) => write!(f, "{e}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Validation(e) => Some(e),
            SimulationError::Cancelled => None,
        }
    }
}

impl From<ValidationError> for SimulationError {
    fn from(e: ValidationError) -> Self {
        SimulationError::Validation(e)
    }
}
