//! Draft initialization for the create and edit screens.
//!
//! Edit mode needs two independent reads, the post and the category
//! directory. [`EditSession`] is the join barrier between them: the draft is
//! seeded once both have arrived, in whichever order, and never again.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::api::AdminApi;
use crate::application::directory::CategoryDirectory;
use crate::application::error::AdminError;
use crate::domain::categories::{Category, SelectableCategorySet};
use crate::domain::posts::{Post, PostDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Default)]
pub struct EditSession {
    post: Option<Post>,
    categories: Option<Vec<Category>>,
    draft: Option<PostDraft>,
    initialized: bool,
    failure: Option<AdminError>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the post read. Returns `true` when this call completed the barrier.
    pub fn post_loaded(&mut self, post: Post) -> bool {
        if self.failure.is_some() {
            return false;
        }
        self.post = Some(post);
        self.try_initialize()
    }

    /// Record a category directory read. Refetches after initialization
    /// refresh the snapshot but leave the draft alone.
    pub fn categories_loaded(&mut self, categories: Vec<Category>) -> bool {
        if self.failure.is_some() {
            return false;
        }
        self.categories = Some(categories);
        self.try_initialize()
    }

    pub fn fetch_failed(&mut self, error: AdminError) {
        if self.initialized {
            warn!(error = %error, "ignoring fetch failure after draft initialization");
            return;
        }
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    pub fn phase(&self) -> EditPhase {
        if self.failure.is_some() {
            EditPhase::Failed
        } else if self.initialized {
            EditPhase::Ready
        } else {
            EditPhase::Loading
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn categories(&self) -> Option<&[Category]> {
        self.categories.as_deref()
    }

    pub fn draft(&self) -> Option<&PostDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut PostDraft> {
        self.draft.as_mut()
    }

    /// Hand the draft to a submission. A rejected submission returns it
    /// inside [`Rejected`](crate::application::submission::Rejected).
    pub fn take_draft(&mut self) -> Option<PostDraft> {
        self.draft.take()
    }

    fn into_ready(mut self) -> Result<Self, AdminError> {
        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }

    fn try_initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        let (Some(post), Some(categories)) = (&self.post, &self.categories) else {
            return false;
        };

        self.draft = Some(PostDraft::from_post(post, categories));
        self.initialized = true;
        debug!(post_id = %post.id, "edit draft initialized");
        true
    }
}

/// Run both edit-mode reads concurrently and feed them into the barrier as
/// they complete.
#[instrument(skip(api))]
pub async fn load_edit_session(
    api: &Arc<dyn AdminApi>,
    post_id: &str,
) -> Result<EditSession, AdminError> {
    let directory = CategoryDirectory::new(Arc::clone(api));
    let post_fetch = async {
        api.get_post(post_id)
            .await
            .map(Post::from)
            .map_err(|source| AdminError::fetch("post", source))
    };
    let category_fetch = directory.fetch_all();
    tokio::pin!(post_fetch, category_fetch);

    let mut session = EditSession::new();
    let mut post_pending = true;
    let mut categories_pending = true;

    while session.phase() == EditPhase::Loading {
        tokio::select! {
            result = &mut post_fetch, if post_pending => {
                post_pending = false;
                match result {
                    Ok(post) => {
                        session.post_loaded(post);
                    }
                    Err(error) => session.fetch_failed(error),
                }
            }
            result = &mut category_fetch, if categories_pending => {
                categories_pending = false;
                match result {
                    Ok(categories) => {
                        session.categories_loaded(categories);
                    }
                    Err(error) => session.fetch_failed(error),
                }
            }
            else => break,
        }
    }

    let session = session.into_ready()?;
    info!(post_id, "edit session ready");
    Ok(session)
}

/// Create mode: one directory read, then an empty draft.
#[instrument(skip(directory))]
pub async fn load_create_draft(directory: &CategoryDirectory) -> Result<PostDraft, AdminError> {
    let categories = directory.fetch_all().await?;
    Ok(PostDraft::new(SelectableCategorySet::initialize(&categories)))
}
