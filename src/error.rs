use thiserror::Error;

/// Failures of the host around the evaluator. Evaluation itself never fails this way:
/// language errors are values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed syntax tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),
}
