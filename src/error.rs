use thiserror::Error;

/// Result type for word-count pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad command-line invocation
    #[error("{0}")]
    Usage(String),

    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file could not be opened
    #[error("Error opening file: {path}: {source}")]
    InputOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input could not be read mid-stream; the run aborts without output
    #[error("Error reading input: {0}")]
    InputRead(#[from] std::io::Error),

    /// Output destination could not be opened
    #[error("Error opening output: {path}: {source}")]
    OutputOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing results failed
    #[error("Error writing output: {0}")]
    OutputWrite(std::io::Error),

    /// A pool worker could not be joined
    #[error("Thread join error: {0}")]
    Thread(String),
}
