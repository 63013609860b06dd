// src/error.rs
//! Error taxonomy for file selection and submissions

use thiserror::Error;

/// Terminal failure of one submission attempt. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("no resume file selected")]
    MissingFile,

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("upload rejected with status {status}{}", detail_suffix(.message))]
    UploadRejected { status: u16, message: Option<String> },

    #[error("invalid response body: {0}")]
    InvalidResponseBody(String),

    #[error("could not start upload: {0}")]
    CouldNotStart(String),
}

impl SubmissionError {
    /// Stable machine-readable code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "MISSING_FILE",
            Self::NetworkError(_) => "NETWORK_ERROR",
            Self::UploadRejected { .. } => "UPLOAD_REJECTED",
            Self::InvalidResponseBody(_) => "INVALID_RESPONSE_BODY",
            Self::CouldNotStart(_) => "COULD_NOT_START",
        }
    }

    /// Text shown to the person who triggered the submission
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFile => "Please upload a PDF first.".to_string(),
            Self::NetworkError(_) => "Network error.".to_string(),
            Self::UploadRejected {
                message: Some(message),
                ..
            } => format!("Upload failed: {}", message),
            Self::UploadRejected { message: None, .. } => "Upload failed.".to_string(),
            Self::InvalidResponseBody(_) => {
                "The analysis service returned an unreadable response.".to_string()
            }
            Self::CouldNotStart(_) => "Could not start upload.".to_string(),
        }
    }
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Rejection of a file at selection time
#[derive(Debug, Error)]
pub enum FileSelectionError {
    #[error("{name} is not a PDF document")]
    NotPdf { name: String },

    #[error("{name} is empty")]
    Empty { name: String },

    #[error("failed to read {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl FileSelectionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotPdf { .. } => "Please upload a PDF file for your resume.",
            Self::Empty { .. } => "The selected file is empty.",
            Self::Unreadable { .. } => "The selected file could not be read.",
        }
    }
}
