use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("population parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
