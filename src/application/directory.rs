use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::api::AdminApi;
use crate::application::error::AdminError;
use crate::domain::categories::Category;

/// Read-through view of every category available for tagging. Each call hits
/// the API; nothing is cached between invocations.
#[derive(Clone)]
pub struct CategoryDirectory {
    api: Arc<dyn AdminApi>,
}

impl CategoryDirectory {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Category>, AdminError> {
        let categories: Vec<Category> = self
            .api
            .list_categories()
            .await
            .map_err(|source| AdminError::fetch("categories", source))?
            .into_iter()
            .map(Category::from)
            .collect();
        debug!(count = categories.len(), "fetched category directory");
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::api::ApiError;
    use crate::application::testing::FakeApi;

    #[tokio::test]
    async fn fetch_all_maps_wire_categories() {
        let api = Arc::new(FakeApi::new().with_categories(&[("a", "Rust"), ("b", "Go")]));
        let directory = CategoryDirectory::new(api.clone());

        let categories = directory.fetch_all().await.expect("categories");

        assert_eq!(
            categories,
            vec![
                Category {
                    id: "a".into(),
                    name: "Rust".into()
                },
                Category {
                    id: "b".into(),
                    name: "Go".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn every_call_refetches() {
        let api = Arc::new(FakeApi::new().with_categories(&[("a", "Rust")]));
        let directory = CategoryDirectory::new(api.clone());

        directory.fetch_all().await.expect("first");
        directory.fetch_all().await.expect("second");

        assert_eq!(api.calls(), vec!["GET /categories", "GET /categories"]);
    }

    #[tokio::test]
    async fn non_success_status_becomes_fetch_error() {
        let api = Arc::new(FakeApi::new().failing_reads(ApiError::Status {
            status: 503,
            status_text: "Service Unavailable".into(),
        }));
        let directory = CategoryDirectory::new(api);

        let err = directory.fetch_all().await.expect_err("should fail");

        assert!(matches!(err, AdminError::Fetch { resource: "categories", .. }));
        assert_eq!(err.status(), Some(503));
    }
}
