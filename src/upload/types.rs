use super::SubmissionError;
use bytes::Bytes;
use derivative::Derivative;
use serde::Deserialize;

/// A file chosen by the user that has not been submitted yet.
///
/// Entries are never edited after creation. Two entries with the same name
/// and size are still distinct: the staging area identifies them by position.
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct StagedFile {
    name: String,
    byte_size: u64,
    #[derivative(Debug = "ignore")]
    content: Bytes,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            byte_size: content.len() as u64,
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

/// The outbound request for one submit action.
///
/// Built from a snapshot of the staging sequence and consumed when sent, so a
/// batch can never be reused or edited after it leaves.
#[derive(Debug)]
pub struct BatchSubmission {
    files: Vec<StagedFile>,
}

impl BatchSubmission {
    /// Multipart field every file is attached under.
    pub const FIELD_NAME: &'static str = "files";

    pub fn from_staged(staged: &[StagedFile]) -> Result<Self, SubmissionError> {
        if staged.is_empty() {
            return Err(SubmissionError::NothingToSubmit);
        }

        Ok(Self {
            files: staged.to_vec(),
        })
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(StagedFile::byte_size).sum()
    }

    pub(crate) fn into_files(self) -> Vec<StagedFile> {
        self.files
    }
}

/// Where a successful submission can be retrieved from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShareResult {
    #[default]
    None,
    Single { locator_url: String },
    Batch { batch_id: String, locator_url: String },
}

impl ShareResult {
    pub fn locator_url(&self) -> Option<&str> {
        match self {
            ShareResult::None => None,
            ShareResult::Single { locator_url } | ShareResult::Batch { locator_url, .. } => {
                Some(locator_url)
            }
        }
    }
}

pub type SubmissionOutcome = Result<ShareResult, SubmissionError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadResponse {
    pub files: Vec<UploadedFile>,
    #[serde(default)]
    pub upload_batch_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadedFile {
    pub file_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_file_size_follows_content() {
        let file = StagedFile::new("notes.txt", &b"hello"[..]);
        assert_eq!(file.name(), "notes.txt");
        assert_eq!(file.byte_size(), 5);
    }

    #[test]
    fn empty_batch_is_refused() {
        let err = BatchSubmission::from_staged(&[]).unwrap_err();
        assert!(matches!(err, SubmissionError::NothingToSubmit));
    }

    #[test]
    fn batch_keeps_staged_order() {
        let staged = vec![
            StagedFile::new("b.png", vec![1u8, 2]),
            StagedFile::new("a.png", vec![3u8]),
            StagedFile::new("b.png", vec![1u8, 2]),
        ];

        let batch = BatchSubmission::from_staged(&staged).unwrap();
        let names: Vec<_> = batch.files().iter().map(StagedFile::name).collect();
        assert_eq!(names, ["b.png", "a.png", "b.png"]);
        assert_eq!(batch.total_bytes(), 5);
    }

    #[test]
    fn only_active_results_expose_a_locator() {
        assert_eq!(ShareResult::default(), ShareResult::None);
        assert_eq!(ShareResult::None.locator_url(), None);
        let single = ShareResult::Single {
            locator_url: "https://x/a".to_string(),
        };
        assert_eq!(single.locator_url(), Some("https://x/a"));
    }
}
