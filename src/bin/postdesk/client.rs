#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::sync::Arc;

use postdesk::application::api::{AdminApi, ObjectStore};
use postdesk::application::auth::AuthToken;
use postdesk::application::directory::CategoryDirectory;
use postdesk::application::error::AdminError;
use postdesk::application::submission::SubmissionController;
use postdesk::application::uploads::CoverImageUploader;
use postdesk::config::{LoadError, Settings, StorageBackend, StorageSettings};
use postdesk::infra::error::InfraError;
use postdesk::infra::http::HttpAdminApi;
use postdesk::infra::storage::{FilesystemObjectStore, HttpObjectStore};
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or POSTDESK_SITE_URL)")]
    MissingSite,
    #[error("cover storage is not configured (set storage.endpoint or storage.backend)")]
    MissingStorage,
    #[error("failed to read token file: {0}")]
    TokenFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone)]
pub struct Ctx {
    pub api: Arc<dyn AdminApi>,
    token: Option<AuthToken>,
    storage: Option<StorageSettings>,
}

impl std::fmt::Debug for Ctx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ctx")
            .field("token", &self.token)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl Ctx {
    pub fn new(
        api: Arc<dyn AdminApi>,
        token: Option<AuthToken>,
        storage: Option<StorageSettings>,
    ) -> Self {
        Self {
            api,
            token,
            storage,
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn directory(&self) -> CategoryDirectory {
        CategoryDirectory::new(Arc::clone(&self.api))
    }

    pub fn controller(&self) -> SubmissionController {
        SubmissionController::new(Arc::clone(&self.api))
    }

    /// Built on demand so read-only commands never touch storage.
    pub fn uploader(&self) -> Result<CoverImageUploader, CliError> {
        let storage = self.storage.as_ref().ok_or(CliError::MissingStorage)?;
        let store: Arc<dyn ObjectStore> = match &storage.backend {
            StorageBackend::Http {
                endpoint,
                bucket,
                api_key,
            } => Arc::new(HttpObjectStore::new(
                endpoint.as_str(),
                bucket,
                api_key.clone(),
            )?),
            StorageBackend::Filesystem {
                directory,
                public_base_url,
            } => Arc::new(FilesystemObjectStore::new(
                directory.clone(),
                public_base_url.as_str(),
            )?),
        };
        Ok(CoverImageUploader::new(store, storage.prefix.clone()))
    }
}

/// Token file wins over `POSTDESK_TOKEN`; a blank token counts as absent.
pub fn read_token(cli: &Cli) -> Result<Option<AuthToken>, CliError> {
    if let Some(path) = &cli.token_file {
        let raw = fs::read_to_string(path).map_err(CliError::TokenFile)?;
        return Ok(AuthToken::new(raw));
    }
    Ok(cli.token_env.clone().and_then(AuthToken::new))
}

pub fn build_ctx(cli: &Cli, settings: &Settings) -> Result<Ctx, CliError> {
    let site = settings.api.base_url.as_ref().ok_or(CliError::MissingSite)?;
    let api = HttpAdminApi::new(site.as_str())?;
    Ok(Ctx::new(
        Arc::new(api),
        read_token(cli)?,
        settings.storage.clone(),
    ))
}
