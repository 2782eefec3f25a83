//! In-memory collaborators for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use postdesk_api_types::{
    CategoryRef, CategoryResponse, PostCategoryLink, PostCreatedResponse, PostResponse,
    PostWriteRequest,
};
use time::macros::datetime;
use tokio::sync::Semaphore;
use url::Url;

use crate::application::api::{AdminApi, ApiError, ObjectStore, StorageError, StoredObject};
use crate::application::auth::AuthToken;

pub(crate) fn token() -> AuthToken {
    AuthToken::new("test-token").expect("token")
}

pub(crate) fn post_response(id: &str, category_ids: &[&str]) -> PostResponse {
    PostResponse {
        id: id.to_string(),
        title: format!("title-{id}"),
        content: format!("content-{id}"),
        cover_image_url: String::new(),
        created_at: datetime!(2024-05-01 10:00 UTC),
        categories: category_ids
            .iter()
            .map(|category_id| PostCategoryLink {
                category: CategoryRef {
                    id: (*category_id).to_string(),
                    name: category_id.to_uppercase(),
                },
            })
            .collect(),
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    categories: Vec<CategoryResponse>,
    posts: Vec<PostResponse>,
    read_failure: Option<ApiError>,
    write_failure: Option<ApiError>,
    write_gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<PostWriteRequest>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_categories(mut self, entries: &[(&str, &str)]) -> Self {
        self.categories = entries
            .iter()
            .map(|(id, name)| CategoryResponse {
                id: (*id).to_string(),
                name: (*name).to_string(),
                created_at: datetime!(2024-01-01 0:00 UTC),
                updated_at: datetime!(2024-01-01 0:00 UTC),
            })
            .collect();
        self
    }

    pub(crate) fn with_post(mut self, post: PostResponse) -> Self {
        self.posts.push(post);
        self
    }

    pub(crate) fn failing_reads(mut self, error: ApiError) -> Self {
        self.read_failure = Some(error);
        self
    }

    pub(crate) fn failing_writes(mut self, error: ApiError) -> Self {
        self.write_failure = Some(error);
        self
    }

    /// Writes block until the semaphore hands out a permit.
    pub(crate) fn with_write_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.write_gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn bodies(&self) -> Vec<PostWriteRequest> {
        self.bodies.lock().expect("bodies lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn read<T>(&self, value: impl FnOnce() -> Result<T, ApiError>) -> Result<T, ApiError> {
        match &self.read_failure {
            Some(error) => Err(error.clone()),
            None => value(),
        }
    }

    async fn write(&self) -> Result<(), ApiError> {
        if let Some(gate) = &self.write_gate {
            let permit = gate.acquire().await.expect("gate open");
            permit.forget();
        }
        match &self.write_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ApiError> {
        self.record("GET /categories".into());
        self.read(|| Ok(self.categories.clone()))
    }

    async fn list_posts(&self) -> Result<Vec<PostResponse>, ApiError> {
        self.record("GET /posts".into());
        self.read(|| Ok(self.posts.clone()))
    }

    async fn get_post(&self, id: &str) -> Result<PostResponse, ApiError> {
        self.record(format!("GET /posts/{id}"));
        self.read(|| {
            self.posts
                .iter()
                .find(|post| post.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    status_text: "Not Found".into(),
                })
        })
    }

    async fn create_post(
        &self,
        _token: &AuthToken,
        body: &PostWriteRequest,
    ) -> Result<PostCreatedResponse, ApiError> {
        self.record("POST /admin/posts".into());
        self.bodies.lock().expect("bodies lock").push(body.clone());
        self.write().await?;
        Ok(PostCreatedResponse {
            id: "created-1".into(),
        })
    }

    async fn update_post(
        &self,
        _token: &AuthToken,
        id: &str,
        body: &PostWriteRequest,
    ) -> Result<(), ApiError> {
        self.record(format!("PUT /admin/posts/{id}"));
        self.bodies.lock().expect("bodies lock").push(body.clone());
        self.write().await
    }

    async fn delete_post(&self, _token: &AuthToken, id: &str) -> Result<(), ApiError> {
        self.record(format!("DELETE /admin/posts/{id}"));
        self.write().await
    }

    async fn delete_category(&self, _token: &AuthToken, id: &str) -> Result<(), ApiError> {
        self.record(format!("DELETE /admin/categories/{id}"));
        self.write().await
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    fail: bool,
    uploads: Mutex<Vec<(String, usize, String)>>,
}

impl FakeStore {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn uploads(&self) -> Vec<(String, usize, String)> {
        self.uploads.lock().expect("uploads lock").clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        if self.fail {
            return Err(StorageError::Status {
                status: 400,
                body: "bucket not found".into(),
            });
        }
        self.uploads.lock().expect("uploads lock").push((
            path.to_string(),
            data.len(),
            content_type.to_string(),
        ));
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn public_url(&self, path: &str) -> Result<Url, StorageError> {
        Ok(Url::parse("https://cdn.example.com/public/")?.join(path)?)
    }
}
