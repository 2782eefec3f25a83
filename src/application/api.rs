//! Ports for the external collaborators: the content API and object storage.

use async_trait::async_trait;
use bytes::Bytes;
use postdesk_api_types::{CategoryResponse, PostCreatedResponse, PostResponse, PostWriteRequest};
use thiserror::Error;
use url::Url;

use crate::application::auth::AuthToken;

/// Transport-level failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid resource id `{0}`")]
    InvalidId(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidId(_) => None,
        }
    }
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ApiError>;

    async fn list_posts(&self) -> Result<Vec<PostResponse>, ApiError>;

    async fn get_post(&self, id: &str) -> Result<PostResponse, ApiError>;

    async fn create_post(
        &self,
        token: &AuthToken,
        body: &PostWriteRequest,
    ) -> Result<PostCreatedResponse, ApiError>;

    async fn update_post(
        &self,
        token: &AuthToken,
        id: &str,
        body: &PostWriteRequest,
    ) -> Result<(), ApiError>;

    async fn delete_post(&self, token: &AuthToken, id: &str) -> Result<(), ApiError>;

    async fn delete_category(&self, token: &AuthToken, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object path `{0}`")]
    InvalidPath(String),
    #[error("object payload is empty")]
    EmptyPayload,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("storage responded {status}: {body}")]
    Status { status: u16, body: String },
    #[error("storage transport error: {0}")]
    Transport(String),
    #[error("invalid public url: {0}")]
    Url(#[from] url::ParseError),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `path`, replacing any existing object.
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    fn public_url(&self, path: &str) -> Result<Url, StorageError>;
}
