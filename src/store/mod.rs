//! The favorites item store.

pub mod favorites;

pub use favorites::{bootstrap_archive, normalize_path, BatchAdd, FavoriteStore};
