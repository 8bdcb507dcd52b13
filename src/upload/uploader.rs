use crate::upload::types::{ErrorResponse, UploadResponse};
use crate::upload::{BatchSubmission, ShareResult, StagedFile, SubmissionError, SubmissionOutcome};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode, Url};
use tracing::{debug, info, warn};

/// Sends staged files to the upload service and turns its answer into a
/// [`ShareResult`].
///
/// One call to [`BatchUploader::send`] is exactly one `POST /upload/multiple`.
/// Nothing is retried or cached, so submitting the same files twice talks to
/// the service twice.
#[derive(Clone)]
pub struct BatchUploader {
    client: Client,
    base_url: String,
}

impl BatchUploader {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a batch from `staged` and sends it. An empty slice fails with
    /// [`SubmissionError::NothingToSubmit`] before any request is made.
    pub async fn submit(&self, staged: &[StagedFile]) -> SubmissionOutcome {
        let batch = BatchSubmission::from_staged(staged)?;
        self.send(batch).await
    }

    pub async fn send(&self, batch: BatchSubmission) -> SubmissionOutcome {
        let url = format!("{}/upload/multiple", self.base_url);
        info!(
            files = batch.len(),
            bytes = batch.total_bytes(),
            "Submitting upload batch"
        );

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(build_form(batch))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Upload request failed before a response arrived");
                SubmissionError::Transport(e)
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(SubmissionError::Transport)?;
        debug!(%status, body_len = body.len(), "Upload service responded");

        resolve_response(status, &body, &self.base_url)
    }
}

fn build_form(batch: BatchSubmission) -> Form {
    batch.into_files().into_iter().fold(Form::new(), |form, file| {
        form.part(BatchSubmission::FIELD_NAME, file_part(&file))
    })
}

/// One multipart part per file, typed from its extension.
fn file_part(file: &StagedFile) -> Part {
    let mime = mime_guess::from_path(file.name()).first_or_octet_stream();
    let part = || {
        Part::stream_with_length(Body::from(file.content().clone()), file.byte_size())
            .file_name(file.name().to_string())
    };

    match part().mime_str(mime.as_ref()) {
        Ok(typed) => typed,
        Err(e) => {
            warn!(error = %e, name = file.name(), %mime, "Sending part without a content type");
            part()
        }
    }
}

/// Interprets a response from the upload service.
///
/// `base_url` is used to build the download-all locator for batches and to
/// resolve service-relative file URLs.
pub fn resolve_response(status: StatusCode, body: &[u8], base_url: &str) -> SubmissionOutcome {
    let base_url = base_url.trim_end_matches('/');

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorResponse>(body)
            .ok()
            .and_then(|error| error.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("status {}", status));
        warn!(%status, %message, "Upload rejected by service");
        return Err(SubmissionError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let response: UploadResponse = serde_json::from_slice(body).map_err(|e| {
        SubmissionError::InvalidResponse(format!("Failed to parse upload response: {}", e))
    })?;

    match response.files.as_slice() {
        [] => Err(SubmissionError::EmptyResult),
        [file] => {
            let locator_url = resolve_file_url(base_url, &file.file_url);
            info!(%locator_url, "Single file uploaded");
            Ok(ShareResult::Single { locator_url })
        }
        files => {
            let batch_id = response
                .upload_batch_id
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| {
                    SubmissionError::InvalidResponse(format!(
                        "{} files returned without an uploadBatchId",
                        files.len()
                    ))
                })?;
            let locator_url = download_all_url(base_url, &batch_id);
            info!(files = files.len(), %batch_id, "Batch uploaded");
            Ok(ShareResult::Batch {
                batch_id,
                locator_url,
            })
        }
    }
}

fn download_all_url(base_url: &str, batch_id: &str) -> String {
    format!(
        "{}/upload/download-all/{}",
        base_url,
        urlencoding::encode(batch_id)
    )
}

fn resolve_file_url(base_url: &str, file_url: &str) -> String {
    if Url::parse(file_url).is_ok() {
        return file_url.to_string();
    }

    format!("{}/{}", base_url, file_url.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://share.example.com";

    #[test]
    fn single_file_uses_its_own_url() {
        let body = br#"{"files":[{"fileUrl":"https://x/a"}]}"#;
        let result = resolve_response(StatusCode::OK, body, BASE).unwrap();
        assert_eq!(
            result,
            ShareResult::Single {
                locator_url: "https://x/a".to_string()
            }
        );
    }

    #[test]
    fn multiple_files_point_at_download_all() {
        let body =
            br#"{"files":[{"fileUrl":"https://x/a"},{"fileUrl":"https://x/b"}],"uploadBatchId":"XYZ"}"#;
        let result = resolve_response(StatusCode::CREATED, body, BASE).unwrap();
        assert_eq!(
            result,
            ShareResult::Batch {
                batch_id: "XYZ".to_string(),
                locator_url: format!("{BASE}/upload/download-all/XYZ"),
            }
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let body = br#"{"files":[{"fileUrl":"a"},{"fileUrl":"b"}],"uploadBatchId":"42"}"#;
        let result = resolve_response(StatusCode::OK, body, "http://localhost:3000/").unwrap();
        assert_eq!(
            result.locator_url(),
            Some("http://localhost:3000/upload/download-all/42")
        );
    }

    #[test]
    fn relative_file_url_is_resolved_against_service() {
        let body = br#"{"files":[{"fileUrl":"/uploads/report.pdf"}]}"#;
        let result = resolve_response(StatusCode::OK, body, BASE).unwrap();
        assert_eq!(
            result.locator_url(),
            Some("https://share.example.com/uploads/report.pdf")
        );
    }

    #[test]
    fn empty_file_list_is_a_contract_violation() {
        let body = br#"{"files":[]}"#;
        let err = resolve_response(StatusCode::OK, body, BASE).unwrap_err();
        assert!(matches!(err, SubmissionError::EmptyResult));
    }

    #[test]
    fn rejection_carries_service_message() {
        let body = br#"{"message":"too large"}"#;
        let err = resolve_response(StatusCode::PAYLOAD_TOO_LARGE, body, BASE).unwrap_err();
        match err {
            SubmissionError::Rejected { status, message } => {
                assert_eq!(status, 413);
                assert_eq!(message, "too large");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejection_without_message_falls_back() {
        let err =
            resolve_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>", BASE).unwrap_err();
        assert_eq!(err.to_string(), "Upload failed: status 502 Bad Gateway");
        match err {
            SubmissionError::Rejected { message, .. } => {
                assert_eq!(message, "status 502 Bad Gateway");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn failure_status_wins_over_success_shaped_body() {
        let body = br#"{"files":[{"fileUrl":"https://x/a"}]}"#;
        let err = resolve_response(StatusCode::INTERNAL_SERVER_ERROR, body, BASE).unwrap_err();
        assert!(matches!(err, SubmissionError::Rejected { status: 500, .. }));
    }

    #[test]
    fn batch_without_id_is_invalid() {
        let body = br#"{"files":[{"fileUrl":"https://x/a"},{"fileUrl":"https://x/b"}]}"#;
        let err = resolve_response(StatusCode::OK, body, BASE).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidResponse(_)));
    }

    #[test]
    fn garbage_success_body_is_invalid() {
        let err = resolve_response(StatusCode::OK, b"not json", BASE).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidResponse(_)));
    }
}
