use reqwest::StatusCode;
use thiserror::Error;

/// Why a workflow invocation stopped early.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("file upload failed with status {status}")]
    UploadFailure { status: StatusCode },

    #[error("analyze request failed with status {status}")]
    AnalysisFailure { status: StatusCode },

    #[error("fetching report failed with status {status}")]
    FetchFailure { status: StatusCode },

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport, body or JSON decoding failure.
    #[error("unexpected error: {0}")]
    Unexpected(#[from] reqwest::Error),
}

impl WorkflowError {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::UploadFailure { .. } => "upload_failure",
            WorkflowError::AnalysisFailure { .. } => "analysis_failure",
            WorkflowError::FetchFailure { .. } => "fetch_failure",
            WorkflowError::InvalidUrl(_) | WorkflowError::Unexpected(_) => "unexpected",
        }
    }
}
