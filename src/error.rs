use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job submission rejected for collection {collection_id}: {message}")]
    Submission {
        collection_id: String,
        message: String,
    },

    #[error("Authentication rejected by the remote service")]
    AuthRejected,

    #[error("Job {job_id} did not finish within {timeout_secs}s")]
    JobTimeout { job_id: String, timeout_secs: u64 },

    #[error("Job {job_id} failed on the remote service: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Job {job_id} produced no result files")]
    Download { job_id: String },

    #[error("No reader could open dataset {}", path.display())]
    DatasetOpen { path: PathBuf },

    #[error("No variable matching '{gas_key}' in dataset {}", path.display())]
    VariableNotFound { gas_key: String, path: PathBuf },

    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Batch run cancelled")]
    Cancelled,
}

impl ExtractionError {
    /// Errors that skip the current candidate collection rather than the
    /// whole location.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ExtractionError::Persistence(_)
                | ExtractionError::Config(_)
                | ExtractionError::AuthRejected
                | ExtractionError::Cancelled
        )
    }
}
