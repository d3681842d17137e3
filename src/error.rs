use thiserror::Error;

/// Errors raised while building or pulling a graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A buffer could not be allocated
    #[error("memory error: {0}")]
    Memory(String),

    /// A parameter had an unusable value
    #[error("value error: {0}")]
    Value(String),

    /// A parameter was outside the domain of the operation
    #[error("domain error: {0}")]
    Domain(String),

    /// An index or position was out of range
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Opening, seeking, reading or writing a sound file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A timed operation could not complete
    #[error("timing error: {0}")]
    Timing(String),

    /// An operation is not allowed while the graph is running
    #[error("run-time error: {0}")]
    RunTime(String),

    /// The graph is wired incorrectly
    #[error("logic error: {0}")]
    Logic(String),
}

impl GraphError {
    /// Whether the error indicates a wiring or allocation bug that must reach the caller
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Logic(_) | Self::Memory(_))
    }
}

impl From<std::io::Error> for GraphError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Result type used throughout the crate
pub type GraphResult<T> = Result<T, GraphError>;
