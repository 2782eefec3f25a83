//! Cover image upload into object storage.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use metrics::counter;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use crate::application::api::{ObjectStore, StorageError};
use crate::application::error::AdminError;
use crate::domain::posts::PostDraft;

/// Public location of an uploaded cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverImage {
    pub path: String,
    pub public_url: String,
}

#[derive(Clone)]
pub struct CoverImageUploader {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl CoverImageUploader {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Upload under a content-addressed path, so re-uploading the same file
    /// overwrites rather than duplicates.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(&self, file_name: &str, data: Bytes) -> Result<CoverImage, AdminError> {
        if data.is_empty() {
            return Err(AdminError::UploadFailed(StorageError::EmptyPayload));
        }

        let path = object_path(&self.prefix, &data);
        let content_type = mime_guess::from_path(Path::new(file_name))
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let stored = match self.store.upload(&path, data, &content_type).await {
            Ok(stored) => stored,
            Err(error) => {
                counter!("postdesk_uploads_total", "outcome" => "failure").increment(1);
                warn!(error = %error, path = %path, "cover image upload failed");
                return Err(AdminError::UploadFailed(error));
            }
        };
        let public_url = self
            .store
            .public_url(&stored.path)
            .map_err(AdminError::UploadFailed)?;

        counter!("postdesk_uploads_total", "outcome" => "success").increment(1);
        info!(path = %stored.path, %public_url, "cover image uploaded");
        Ok(CoverImage {
            path: stored.path,
            public_url: public_url.to_string(),
        })
    }

    /// Upload and point the draft at the result. On failure the draft is not
    /// modified.
    pub async fn attach(
        &self,
        draft: &mut PostDraft,
        file_name: &str,
        data: Bytes,
    ) -> Result<CoverImage, AdminError> {
        let image = self.upload(file_name, data).await?;
        draft.cover_image_url.clone_from(&image.public_url);
        Ok(image)
    }
}

fn object_path(prefix: &str, data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let hash = hex::encode(&digest[..]);
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        hash
    } else {
        format!("{prefix}/{hash}")
    }
}
