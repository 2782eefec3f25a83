//! Screen-level state and the ports it talks through.

pub mod api;
pub mod auth;
pub mod collection;
pub mod directory;
pub mod editor;
pub mod error;
pub mod submission;
pub mod uploads;

#[cfg(test)]
pub(crate) mod testing;
