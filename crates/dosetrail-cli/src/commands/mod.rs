pub mod classify;
pub mod config;
pub mod input;
pub mod summary;
pub mod timeline;
