//! Error types for the sidelist library.

use thiserror::Error;

/// All errors that can occur in the sidelist library.
#[derive(Error, Debug)]
pub enum SidelistError {
    /// Invalid magic bytes in the archive envelope.
    #[error("Invalid magic bytes in archive envelope")]
    InvalidMagic,

    /// Unsupported container format version.
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// Input is empty or ends mid-record.
    #[error("Archive is empty or truncated")]
    Truncated,

    /// Corrupt data at a given byte offset.
    #[error("Corrupt data at offset {0}")]
    Corrupt(u64),

    /// Object table record carries a class tag outside the supported set.
    #[error("Unknown class tag 0x{0:02x} in object table")]
    UnknownClassTag(u8),

    /// UID back-reference points outside the object table.
    #[error("Reference to object {uid} is out of range (table holds {count})")]
    BadReference { uid: u32, count: u32 },

    /// UID back-reference re-enters its own materialization.
    #[error("Cyclic reference through object {0}")]
    CyclicReference(u32),

    /// Dictionary key UID does not reference a string record.
    #[error("Dictionary key {0} is not a string")]
    InvalidKey(u32),

    /// Dictionary contains the same key twice.
    #[error("Duplicate dictionary key: {0}")]
    DuplicateKey(String),

    /// A required archive field is missing.
    #[error("Archive is missing required field `{0}`")]
    MissingField(&'static str),

    /// An archive field has the wrong shape.
    #[error("Archive field `{field}` is not a {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },

    /// Path cannot be normalized to an absolute form.
    #[error("Cannot resolve path `{path}`: {reason}")]
    PathUnresolvable { path: String, reason: String },

    /// A favorite for the resolved path already exists.
    #[error("Favorite already exists: {0}")]
    DuplicateFavorite(String),

    /// Every path in a batch add failed.
    #[error("All {0} paths failed, nothing was saved")]
    AllAddsFailed(usize),

    /// Location collaborator could not mint or resolve a token.
    #[error("Location token error: {0}")]
    Bookmark(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for sidelist operations.
pub type SidelistResult<T> = Result<T, SidelistError>;
