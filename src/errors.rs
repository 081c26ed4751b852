use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid timestep: {0} s")]
    InvalidTimestep(f64),

    #[error("Satellite index {index} out of range (live count {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
