use thiserror::Error;

use crate::application::api::{ApiError, StorageError};

#[derive(Debug, Error)]
pub enum AdminError {
    /// A read failed. The owning screen cannot continue.
    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("authentication required")]
    AuthRequired,
    #[error("another submission is still in flight")]
    SubmissionInFlight,
    /// A write failed. The draft is kept and the user may retry.
    #[error("request failed: {0}")]
    RequestFailed(#[source] ApiError),
    #[error("upload failed: {0}")]
    UploadFailed(#[source] StorageError),
}

impl AdminError {
    pub fn fetch(resource: &'static str, source: ApiError) -> Self {
        Self::Fetch { resource, source }
    }

    /// HTTP status carried by the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { source, .. } | Self::RequestFailed(source) => source.status(),
            Self::UploadFailed(StorageError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
