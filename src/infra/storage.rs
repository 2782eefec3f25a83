//! Object storage backends for cover images.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url, header::AUTHORIZATION, header::CONTENT_TYPE};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, instrument};

use crate::application::api::{ObjectStore, StorageError, StoredObject};
use crate::infra::error::InfraError;
use crate::infra::http::directory_url;

/// Bucket-style HTTP object store (Supabase storage API layout).
///
/// Uploads go to `{endpoint}/storage/v1/object/{bucket}/{path}` with upsert
/// enabled; public URLs are `{endpoint}/storage/v1/object/public/{bucket}/{path}`.
#[derive(Clone, Debug)]
pub struct HttpObjectStore {
    client: Client,
    endpoint: Url,
    bucket: String,
    api_key: Option<String>,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str, bucket: &str, api_key: Option<String>) -> Result<Self, InfraError> {
        let bucket = bucket.trim_matches('/');
        if bucket.is_empty() {
            return Err(InfraError::configuration("storage bucket must not be empty"));
        }
        let client = Client::builder()
            .user_agent(concat!("postdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| InfraError::configuration(format!("http client: {err}")))?;
        Ok(Self {
            client,
            endpoint: directory_url(endpoint)?,
            bucket: bucket.to_string(),
            api_key,
        })
    }

    fn object_url(&self, scope: &str, path: &str) -> Result<Url, StorageError> {
        let relative = ensure_relative(path)?;
        Ok(self
            .endpoint
            .join(&format!("storage/v1/object/{scope}{}/{relative}", self.bucket))?)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        if data.is_empty() {
            return Err(StorageError::EmptyPayload);
        }
        let url = self.object_url("", path)?;
        let mut req = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(data);
        if let Some(key) = &self.api_key {
            req = req
                .header(AUTHORIZATION, format!("Bearer {key}"))
                .header("apikey", key.as_str());
        }

        let resp = req
            .send()
            .await
            .map_err(|err| StorageError::Transport(err.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|err| StorageError::Transport(err.to_string()))?;
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // The object path is ours; the response body is not consulted.
        debug!(path, "object stored");
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn public_url(&self, path: &str) -> Result<Url, StorageError> {
        self.object_url("public/", path)
    }
}

/// Directory-backed object store for local setups; a static file server is
/// expected to expose `root` at `public_base`.
#[derive(Debug)]
pub struct FilesystemObjectStore {
    root: PathBuf,
    public_base: Url,
}

impl FilesystemObjectStore {
    /// Creates `root` if it does not exist yet.
    pub fn new(root: PathBuf, public_base: &str) -> Result<Self, InfraError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base: directory_url(public_base)?,
        })
    }

    pub fn absolute_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(ensure_relative(path)?))
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        if data.is_empty() {
            return Err(StorageError::EmptyPayload);
        }
        let absolute = self.absolute_path(path)?;
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&absolute).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn public_url(&self, path: &str) -> Result<Url, StorageError> {
        let relative = ensure_relative(path)?;
        Ok(self.public_base.join(relative)?)
    }
}

/// Reject absolute paths and parent traversal.
fn ensure_relative(path: &str) -> Result<&str, StorageError> {
    let relative = Path::new(path);
    if path.is_empty()
        || relative.is_absolute()
        || path.starts_with('/')
        || relative
            .components()
            .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(path)
}
