#![deny(clippy::all, clippy::pedantic)]

pub mod categories;
pub mod posts;
pub mod uploads;
