//! Post list screen: every post, the categories they use, and a client-side
//! category filter.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::api::AdminApi;
use crate::application::error::AdminError;
use crate::domain::categories::Category;
use crate::domain::posts::Post;

/// Distinct categories attached to any of `posts`, de-duplicated by id.
pub fn derive_category_options(posts: &[Post]) -> Vec<Category> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .flat_map(|post| post.categories.iter())
        .filter(|category| seen.insert(category.id.as_str()))
        .cloned()
        .collect()
}

/// Posts carrying `category_id`, in their original order. `None` or an empty
/// id selects everything.
pub fn filter_by_category<'a>(posts: &'a [Post], category_id: Option<&str>) -> Vec<&'a Post> {
    match category_id.filter(|id| !id.is_empty()) {
        None => posts.iter().collect(),
        Some(id) => posts.iter().filter(|post| post.has_category(id)).collect(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostCollectionView {
    posts: Vec<Post>,
    category_options: Vec<Category>,
    selected_category: Option<String>,
}

impl PostCollectionView {
    pub fn new(posts: Vec<Post>) -> Self {
        let category_options = derive_category_options(&posts);
        Self {
            posts,
            category_options,
            selected_category: None,
        }
    }

    #[instrument(skip(api))]
    pub async fn load(api: &dyn AdminApi) -> Result<Self, AdminError> {
        let posts: Vec<Post> = api
            .list_posts()
            .await
            .map_err(|source| AdminError::fetch("posts", source))?
            .into_iter()
            .map(Post::from)
            .collect();
        debug!(count = posts.len(), "fetched post collection");
        Ok(Self::new(posts))
    }

    /// Replace the posts with a fresh read, keeping the selected filter.
    pub async fn refetch(&mut self, api: &dyn AdminApi) -> Result<(), AdminError> {
        let fresh = Self::load(api).await?;
        self.posts = fresh.posts;
        self.category_options = fresh.category_options;
        Ok(())
    }

    pub fn select_category(&mut self, category_id: Option<String>) {
        self.selected_category = category_id.filter(|id| !id.is_empty());
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn category_options(&self) -> &[Category] {
        &self.category_options
    }

    /// Recomputed on every call from the current snapshot and filter.
    pub fn visible(&self) -> Vec<&Post> {
        filter_by_category(&self.posts, self.selected_category())
    }
}
