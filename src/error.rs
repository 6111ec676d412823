use std::path::PathBuf;

/// Input-contract violations, detected at the boundary before the engine runs.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("failed to read request from {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),
}

pub type RequestResult<T> = Result<T, RequestError>;
