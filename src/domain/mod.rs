//! Client-side domain model: categories, posts and drafts.

pub mod categories;
pub mod posts;
