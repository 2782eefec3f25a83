//! postdesk: headless admin client for a blog content API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
