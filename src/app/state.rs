use crate::config::StagingPolicy;
use crate::staging::StagingArea;
use crate::upload::{BatchSubmission, ShareResult, StagedFile, SubmissionError, SubmissionOutcome};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SharePhase {
    #[default]
    Idle,
    Submitting,
    Resolved,
    Failed,
}

#[derive(Debug)]
pub enum ShareEvent {
    Add(Vec<StagedFile>),
    Remove(usize),
    Submit,
    Finished(SubmissionOutcome),
    Dismiss,
}

/// Work the shell has to carry out after an event.
#[derive(Debug)]
pub enum ShareEffect {
    /// Send this batch. Exactly one is emitted per accepted submit.
    Dispatch(BatchSubmission),
}

/// Everything the share flow remembers between frames.
///
/// All changes go through [`ShareState::handle`], so the flow can be driven
/// and checked without a window.
#[derive(Debug, Default)]
pub struct ShareState {
    staging: StagingArea,
    result: ShareResult,
    phase: SharePhase,
    notice: Option<String>,
    policy: StagingPolicy,
    /// Copy of the files in the outstanding batch.
    in_flight: Vec<StagedFile>,
}

impl ShareState {
    pub fn new(policy: StagingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn handle(&mut self, event: ShareEvent) -> Option<ShareEffect> {
        match event {
            ShareEvent::Add(files) => {
                self.settle();
                self.staging.add(files);
                None
            }
            ShareEvent::Remove(index) => {
                self.settle();
                self.staging.remove_at(index);
                None
            }
            ShareEvent::Submit => match self.begin_submission() {
                Ok(batch) => Some(ShareEffect::Dispatch(batch)),
                Err(e) => {
                    self.notice = Some(e.to_string());
                    None
                }
            },
            ShareEvent::Finished(outcome) => {
                self.finish_submission(outcome);
                None
            }
            ShareEvent::Dismiss => {
                self.notice = None;
                if self.phase == SharePhase::Failed {
                    self.phase = SharePhase::Idle;
                }
                None
            }
        }
    }

    /// Snapshots the staged files into a batch and enters `Submitting`.
    ///
    /// Only one submission may be outstanding; a second one is refused with
    /// [`SubmissionError::AlreadySubmitting`] and leaves the first untouched.
    pub fn begin_submission(&mut self) -> Result<BatchSubmission, SubmissionError> {
        if self.phase == SharePhase::Submitting {
            warn!("Submit requested while an upload is outstanding");
            return Err(SubmissionError::AlreadySubmitting);
        }

        self.settle();
        match BatchSubmission::from_staged(self.staging.files()) {
            Ok(batch) => {
                info!(files = batch.len(), "Starting submission");
                self.in_flight = batch.files().to_vec();
                self.phase = SharePhase::Submitting;
                self.notice = None;
                Ok(batch)
            }
            Err(e) => {
                self.phase = SharePhase::Failed;
                Err(e)
            }
        }
    }

    /// Applies the outcome of the outstanding submission.
    pub fn finish_submission(&mut self, outcome: SubmissionOutcome) {
        if self.phase != SharePhase::Submitting {
            warn!(phase = ?self.phase, "Ignoring outcome with no submission outstanding");
            return;
        }

        let submitted = std::mem::take(&mut self.in_flight);
        match outcome {
            Ok(result) => {
                info!(locator = result.locator_url().unwrap_or_default(), "Submission resolved");
                self.result = result;
                self.phase = SharePhase::Resolved;
                self.notice = None;
                if self.policy == StagingPolicy::ClearOnSuccess {
                    self.staging.remove_submitted(&submitted);
                }
            }
            Err(e) => {
                error!(error = %e, "Submission failed");
                self.phase = SharePhase::Failed;
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn result(&self) -> &ShareResult {
        &self.result
    }

    pub fn phase(&self) -> SharePhase {
        self.phase
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SharePhase::Submitting
    }

    /// Leaves a finished state once the user does something new. An
    /// outstanding submission is never interrupted by staging edits.
    fn settle(&mut self) {
        if matches!(self.phase, SharePhase::Resolved | SharePhase::Failed) {
            self.phase = SharePhase::Idle;
            self.notice = None;
        }
    }
}
