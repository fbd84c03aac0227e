use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuadscanError {
    #[error("Invalid beam energy: {0}")]
    InvalidEnergy(String),

    #[error("Invalid fit data: {0}")]
    InvalidFitData(String),

    #[error("Quadrupole strength is zero at current {current} A")]
    ZeroStrength { current: f64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Linear algebra error: {0}")]
    LinAlg(String),
}

pub type QuadscanResult<T> = Result<T, QuadscanError>;
