use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum KeplerError {
    #[error("Invalid gravitational parameter: {0} (must be finite and strictly positive)")]
    InvalidGravitationalParameter(f64),

    #[error("Non-finite input: {0}")]
    NonFiniteInput(String),

    #[error("Degenerate orbit: {0}")]
    DegenerateOrbit(String),

    #[error(
        "Anomaly solver did not converge after {iterations} iterations (last residual {residual:e})"
    )]
    AnomalyNotConverged { iterations: usize, residual: f64 },

    #[error("Invalid Kepler solver parameter: {0}")]
    InvalidSolverParameter(String),

    #[error("Invalid element conversion: {0}")]
    InvalidConversion(String),

    #[error("ROOTS finding error: {0}")]
    RootFinding(#[from] roots::SearchError),
}
