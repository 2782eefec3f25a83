//! Posts as fetched from the server and the local draft used to edit them.

use std::collections::HashSet;

use postdesk_api_types::{PostResponse, PostWriteRequest};
use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::categories::{Category, SelectableCategorySet};

/// Server-owned post. The client only ever holds a transient copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub cover_image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub categories: Vec<Category>,
}

impl Post {
    pub fn category_ids(&self) -> HashSet<String> {
        self.categories
            .iter()
            .map(|category| category.id.clone())
            .collect()
    }

    pub fn has_category(&self, id: &str) -> bool {
        self.categories.iter().any(|category| category.id == id)
    }
}

impl From<PostResponse> for Post {
    fn from(value: PostResponse) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            cover_image_url: value.cover_image_url,
            created_at: value.created_at,
            categories: value
                .categories
                .into_iter()
                .map(|link| Category::from(link.category))
                .collect(),
        }
    }
}

/// Unsaved state of a post being authored or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub cover_image_url: String,
    pub categories: SelectableCategorySet,
}

impl PostDraft {
    /// Empty draft for create mode.
    pub fn new(categories: SelectableCategorySet) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    /// Draft seeded from an existing post; checkboxes reflect the post's links
    /// against the given directory.
    pub fn from_post(post: &Post, directory: &[Category]) -> Self {
        let categories =
            SelectableCategorySet::initialize(directory).apply_selection(&post.category_ids());
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            cover_image_url: post.cover_image_url.clone(),
            categories,
        }
    }

    pub fn toggle_category(&mut self, id: &str) -> bool {
        self.categories.toggle(id)
    }

    pub fn to_request(&self) -> PostWriteRequest {
        PostWriteRequest {
            title: self.title.clone(),
            content: self.content.clone(),
            cover_image_url: self.cover_image_url.clone(),
            category_ids: self.categories.selected_in_order(),
        }
    }
}
