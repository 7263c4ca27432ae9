//! sidelist — ordered favorites list stored in a keyed object-archive container.
//!
//! Decodes the .slar container format into a generic value tree, applies
//! list operations (append, remove-by-target, clear, enumerate) with strict
//! invariants, and re-encodes losslessly. Location tokens stay opaque behind
//! the [`location::LocationResolver`] boundary.

pub mod archive;
pub mod cli;
pub mod location;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use archive::{ArchiveHeader, ArchiveReader, ArchiveWriter, HEADER_SIZE};
pub use location::{LocationResolver, MockResolver, PortableResolver, ResolvedLocation};
pub use store::{bootstrap_archive, normalize_path, BatchAdd, FavoriteStore};
pub use types::{
    FavoriteEntry, FavoriteItem, SidelistError, SidelistResult, Value, FORCE_TEMPLATE_ICONS_KEY,
    FORMAT_VERSION, ITEMS_KEY, PROPERTIES_KEY, SLAR_MAGIC,
};
