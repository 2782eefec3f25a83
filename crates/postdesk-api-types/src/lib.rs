//! Wire shapes for the blog content API.
//!
//! Field names follow the server's camelCase JSON. Timestamps are RFC 3339.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Entry of `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Category as embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

/// Join-table row wrapping an embedded category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCategoryLink {
    pub category: CategoryRef,
}

/// Entry of `GET /posts` and body of `GET /posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "coverImageURL", default)]
    pub cover_image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub categories: Vec<PostCategoryLink>,
}

/// Body of `POST /admin/posts` and `PUT /admin/posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWriteRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "coverImageURL")]
    pub cover_image_url: String,
    pub category_ids: Vec<String>,
}

/// The only part of a created post the client relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCreatedResponse {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_response_reads_nested_categories() {
        let raw = r#"{
            "id": "p1",
            "title": "Hello",
            "content": "Body",
            "coverImageURL": "https://cdn.example.com/a.png",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "categories": [{"category": {"id": "c1", "name": "Rust"}}]
        }"#;

        let post: PostResponse = serde_json::from_str(raw).expect("valid post");
        assert_eq!(post.cover_image_url, "https://cdn.example.com/a.png");
        assert_eq!(post.categories.len(), 1);
        assert_eq!(post.categories[0].category.id, "c1");
    }

    #[test]
    fn write_request_uses_server_field_names() {
        let body = PostWriteRequest {
            title: "T".into(),
            content: "C".into(),
            cover_image_url: String::new(),
            category_ids: vec!["a".into()],
        };

        let value = serde_json::to_value(&body).expect("serializable");
        assert_eq!(value["coverImageURL"], "");
        assert_eq!(value["categoryIds"][0], "a");
    }

    #[test]
    fn created_response_ignores_extra_fields() {
        let created: PostCreatedResponse =
            serde_json::from_str(r#"{"id":"new","title":"T","content":"C"}"#).expect("valid");
        assert_eq!(created.id, "new");
    }
}
