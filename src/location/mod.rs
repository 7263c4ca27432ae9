//! Location collaborator boundary.
//!
//! The store never interprets location tokens itself. It asks a
//! [`LocationResolver`] to mint a token for a path and to resolve a stored
//! token back to a comparable path. The platform's own token format is opaque
//! and versioned; [`PortableResolver`] is a stand-in with the same contract,
//! and [`MockResolver`] is the test double.

use std::collections::HashSet;
use std::path::Path;

use crate::types::error::{SidelistError, SidelistResult};

/// A token resolved back to a path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Best-effort absolute path for the token's target.
    pub path: String,
    /// The target may have moved since the token was minted. Informational:
    /// the path is still valid for comparison.
    pub stale: bool,
}

/// Encode/decode contract between the store and the location collaborator.
pub trait LocationResolver {
    /// Mint a stable token for an absolute path. Fails when the path cannot
    /// be turned into a later-resolvable token (e.g. the target vanished).
    fn encode_location(&self, path: &Path) -> SidelistResult<Vec<u8>>;

    /// Resolve a token back to a path. Fails only on a corrupt token; a
    /// moved target is reported through [`ResolvedLocation::stale`].
    fn decode_location(&self, token: &[u8]) -> SidelistResult<ResolvedLocation>;
}

/// Magic prefix of a portable location token.
const TOKEN_MAGIC: &[u8; 4] = b"slt1";

/// Default resolver used by the CLI.
///
/// Tokens are the 4-byte magic `slt1` followed by the UTF-8 path. Encoding
/// requires the target to exist; decoding flags a no-longer-existing target
/// as stale rather than failing.
#[derive(Debug, Default)]
pub struct PortableResolver;

impl PortableResolver {
    pub fn new() -> Self {
        Self
    }
}

impl LocationResolver for PortableResolver {
    fn encode_location(&self, path: &Path) -> SidelistResult<Vec<u8>> {
        if std::fs::symlink_metadata(path).is_err() {
            return Err(SidelistError::Bookmark(format!(
                "no such file or directory: {}",
                path.display()
            )));
        }
        let mut token = TOKEN_MAGIC.to_vec();
        token.extend_from_slice(path.to_string_lossy().as_bytes());
        Ok(token)
    }

    fn decode_location(&self, token: &[u8]) -> SidelistResult<ResolvedLocation> {
        let rest = token
            .strip_prefix(TOKEN_MAGIC.as_slice())
            .ok_or_else(|| SidelistError::Bookmark("corrupt location token".to_string()))?;
        let path = std::str::from_utf8(rest)
            .map_err(|_| SidelistError::Bookmark("corrupt location token".to_string()))?
            .to_string();
        let stale = std::fs::symlink_metadata(&path).is_err();
        if stale {
            log::debug!("location target missing, reporting stale: {}", path);
        }
        Ok(ResolvedLocation { path, stale })
    }
}

/// In-memory resolver for tests: tokens are the path bytes verbatim.
#[derive(Debug, Default)]
pub struct MockResolver {
    denied: HashSet<String>,
    stale: HashSet<String>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `encode_location` fail for this path, as if the target vanished.
    pub fn deny(&mut self, path: impl Into<String>) {
        self.denied.insert(path.into());
    }

    /// Mark tokens for this path as stale on decode.
    pub fn mark_stale(&mut self, path: impl Into<String>) {
        self.stale.insert(path.into());
    }
}

impl LocationResolver for MockResolver {
    fn encode_location(&self, path: &Path) -> SidelistResult<Vec<u8>> {
        let display = path.to_string_lossy().to_string();
        if self.denied.contains(&display) {
            return Err(SidelistError::Bookmark(format!(
                "no such file or directory: {}",
                display
            )));
        }
        Ok(display.into_bytes())
    }

    fn decode_location(&self, token: &[u8]) -> SidelistResult<ResolvedLocation> {
        let path = String::from_utf8(token.to_vec())
            .map_err(|_| SidelistError::Bookmark("corrupt location token".to_string()))?;
        let stale = self.stale.contains(&path);
        Ok(ResolvedLocation { path, stale })
    }
}
