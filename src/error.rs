//! Error types for fusion-eval

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// fusion-eval error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid or unloadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Evaluation directory layout violation
    #[error("Dataset layout error: {0}")]
    Layout(String),

    /// Evaluator infrastructure failure (spawn, exit, output contract)
    ///
    /// Distinct from the legitimate no-valid-grasp outcome, which is
    /// reported through `EvalOutcome`, not as an error.
    #[error("Evaluator failure: {0}")]
    Evaluator(String),

    /// Unrecognized fusion method or weight name
    #[error("Unknown {kind} name: {value:?}")]
    UnknownName {
        /// What was being parsed ("fusion method", "fusion weight")
        kind: &'static str,
        /// The offending input
        value: String,
    },

    /// Malformed result table file
    #[error("Malformed result table {path}:{line}: {message}")]
    MalformedTable {
        /// Table file path
        path: String,
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
}
