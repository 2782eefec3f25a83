//! reqwest-backed adapter for the content API.

use async_trait::async_trait;
use postdesk_api_types::{CategoryResponse, PostCreatedResponse, PostResponse, PostWriteRequest};
use reqwest::{Client, Method, RequestBuilder, Response, Url, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::api::{AdminApi, ApiError};
use crate::application::auth::AuthToken;
use crate::infra::error::InfraError;

#[derive(Clone, Debug)]
pub struct HttpAdminApi {
    client: Client,
    base: Url,
}

impl HttpAdminApi {
    /// `site` is the API root, e.g. `https://blog.example.com/api`. Endpoint
    /// paths are resolved relative to it.
    pub fn new(site: &str) -> Result<Self, InfraError> {
        let base = directory_url(site)?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::configuration(format!("http client: {err}")))?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("postdesk/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `segments` beneath the base. Each segment is percent-encoded
    /// on its own, so an id can never step into a sibling endpoint.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::Transport(format!("base url `{}` cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&AuthToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut req = self.client.request(method, self.url(segments)?);
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, token.bearer());
        }
        Ok(req)
    }

    async fn send(req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        match resp.text().await {
            Ok(body) => debug!(status = status.as_u16(), body = %body, "api returned error status"),
            Err(err) => debug!(
                status = status.as_u16(),
                error = %err,
                "api returned error status; body unreadable"
            ),
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }

    async fn handle<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
        let bytes = Self::send(req)
            .await?
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn handle_unit(req: RequestBuilder) -> Result<(), ApiError> {
        Self::send(req).await.map(drop)
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ApiError> {
        Self::handle(self.request(Method::GET, &["categories"], None)?).await
    }

    #[instrument(skip(self))]
    async fn list_posts(&self) -> Result<Vec<PostResponse>, ApiError> {
        Self::handle(self.request(Method::GET, &["posts"], None)?).await
    }

    #[instrument(skip(self))]
    async fn get_post(&self, id: &str) -> Result<PostResponse, ApiError> {
        let id = resource_id(id)?;
        Self::handle(self.request(Method::GET, &["posts", id], None)?).await
    }

    #[instrument(skip(self, token, body))]
    async fn create_post(
        &self,
        token: &AuthToken,
        body: &PostWriteRequest,
    ) -> Result<PostCreatedResponse, ApiError> {
        let req = self
            .request(Method::POST, &["admin", "posts"], Some(token))?
            .json(body);
        Self::handle(req).await
    }

    #[instrument(skip(self, token, body))]
    async fn update_post(
        &self,
        token: &AuthToken,
        id: &str,
        body: &PostWriteRequest,
    ) -> Result<(), ApiError> {
        let id = resource_id(id)?;
        let req = self
            .request(Method::PUT, &["admin", "posts", id], Some(token))?
            .json(body);
        Self::handle_unit(req).await
    }

    #[instrument(skip(self, token))]
    async fn delete_post(&self, token: &AuthToken, id: &str) -> Result<(), ApiError> {
        let id = resource_id(id)?;
        let req = self.request(Method::DELETE, &["admin", "posts", id], Some(token))?;
        Self::handle_unit(req).await
    }

    #[instrument(skip(self, token))]
    async fn delete_category(&self, token: &AuthToken, id: &str) -> Result<(), ApiError> {
        let id = resource_id(id)?;
        let req = self.request(Method::DELETE, &["admin", "categories", id], Some(token))?;
        Self::handle_unit(req).await
    }
}

/// Ids that would not survive as a single path segment are refused before
/// any request is built.
fn resource_id(id: &str) -> Result<&str, ApiError> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(ApiError::InvalidId(id.to_string()));
    }
    Ok(id)
}

/// Parse `raw` and make sure relative joins land beneath it.
pub(crate) fn directory_url(raw: &str) -> Result<Url, InfraError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| InfraError::configuration(format!("invalid url `{raw}`: {err}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
