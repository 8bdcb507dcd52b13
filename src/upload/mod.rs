mod error;
mod types;
mod uploader;

pub use error::SubmissionError;
pub use types::{BatchSubmission, ShareResult, StagedFile, SubmissionOutcome};
pub use uploader::{resolve_response, BatchUploader};
