use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("dataset file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no header row")]
    MissingHeader,
}
