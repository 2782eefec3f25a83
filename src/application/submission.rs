//! Mutating calls and the reconciliation of local state with their outcome.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use metrics::counter;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::api::AdminApi;
use crate::application::auth::AuthToken;
use crate::application::error::AdminError;
use crate::domain::posts::PostDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(PostDraft),
    Update { post_id: String, draft: PostDraft },
    Delete { post_id: String },
}

impl Submission {
    fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    pub fn draft(&self) -> Option<&PostDraft> {
        match self {
            Self::Create(draft) | Self::Update { draft, .. } => Some(draft),
            Self::Delete { .. } => None,
        }
    }

    pub fn into_draft(self) -> Option<PostDraft> {
        match self {
            Self::Create(draft) | Self::Update { draft, .. } => Some(draft),
            Self::Delete { .. } => None,
        }
    }
}

/// What the owning screen should do after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "next", rename_all = "snake_case")]
pub enum SubmitOutcome {
    OpenPost { id: String },
    OpenPostList,
    Refetch,
}

/// A failed submission, handed back untouched so the user can retry.
#[derive(Debug)]
pub struct Rejected {
    pub submission: Box<Submission>,
    pub error: AdminError,
}

/// Issues one mutating request at a time.
///
/// The in-flight flag is a UI lock: a second submit while one is pending is
/// rejected, not queued.
pub struct SubmissionController {
    api: Arc<dyn AdminApi>,
    submitting: AtomicBool,
}

impl SubmissionController {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SubmissionState {
        if self.submitting.load(Ordering::Acquire) {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    #[instrument(skip_all, fields(kind = submission.kind()))]
    pub async fn submit(
        &self,
        submission: Submission,
        token: Option<&AuthToken>,
    ) -> Result<SubmitOutcome, Rejected> {
        let Some(token) = token else {
            return Err(reject(submission, AdminError::AuthRequired));
        };
        let Some(_lock) = SubmitLock::acquire(&self.submitting) else {
            warn!("submission rejected: another request is in flight");
            return Err(reject(submission, AdminError::SubmissionInFlight));
        };

        let kind = submission.kind();
        let result = match &submission {
            Submission::Create(draft) => self
                .api
                .create_post(token, &draft.to_request())
                .await
                .map(|created| SubmitOutcome::OpenPost { id: created.id }),
            Submission::Update { post_id, draft } => self
                .api
                .update_post(token, post_id, &draft.to_request())
                .await
                .map(|()| SubmitOutcome::OpenPostList),
            Submission::Delete { post_id } => self
                .api
                .delete_post(token, post_id)
                .await
                .map(|()| SubmitOutcome::Refetch),
        };

        match result {
            Ok(outcome) => {
                counter!("postdesk_submissions_total", "kind" => kind, "outcome" => "success")
                    .increment(1);
                info!(?outcome, "submission succeeded");
                Ok(outcome)
            }
            Err(source) => {
                counter!("postdesk_submissions_total", "kind" => kind, "outcome" => "failure")
                    .increment(1);
                warn!(error = %source, "submission failed");
                Err(reject(submission, AdminError::RequestFailed(source)))
            }
        }
    }

    /// Delete a post and, on success only, run `refetch` exactly once.
    pub async fn delete_post<F, Fut>(
        &self,
        post_id: &str,
        token: Option<&AuthToken>,
        refetch: F,
    ) -> Result<Fut::Output, AdminError>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let submission = Submission::Delete {
            post_id: post_id.to_string(),
        };
        self.submit(submission, token)
            .await
            .map_err(|rejected| rejected.error)?;
        Ok(refetch().await)
    }

    /// Delete a category from the category screen, then run `refetch`.
    #[instrument(skip(self, token, refetch))]
    pub async fn delete_category<F, Fut>(
        &self,
        category_id: &str,
        token: Option<&AuthToken>,
        refetch: F,
    ) -> Result<Fut::Output, AdminError>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let token = token.ok_or(AdminError::AuthRequired)?;
        let lock = SubmitLock::acquire(&self.submitting).ok_or(AdminError::SubmissionInFlight)?;

        if let Err(source) = self.api.delete_category(token, category_id).await {
            counter!("postdesk_submissions_total", "kind" => "delete_category", "outcome" => "failure")
                .increment(1);
            warn!(error = %source, "category deletion failed");
            return Err(AdminError::RequestFailed(source));
        }
        counter!("postdesk_submissions_total", "kind" => "delete_category", "outcome" => "success")
            .increment(1);
        drop(lock);
        Ok(refetch().await)
    }
}

fn reject(submission: Submission, error: AdminError) -> Rejected {
    Rejected {
        submission: Box::new(submission),
        error,
    }
}

/// Holds the in-flight flag; dropping it returns the controller to `Idle`.
struct SubmitLock<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmitLock<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmitLock<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
