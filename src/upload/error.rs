use thiserror::Error;

/// Every way a submit action can end without a share result.
///
/// None of these are fatal and none touch the staging area.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("No files to share!")]
    NothingToSubmit,

    #[error("An upload is already in progress")]
    AlreadySubmitting,

    #[error("Error uploading files: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Upload failed: {message}")]
    Rejected { status: u16, message: String },

    #[error("Upload service returned no files")]
    EmptyResult,

    #[error("Unexpected response from upload service: {0}")]
    InvalidResponse(String),
}
