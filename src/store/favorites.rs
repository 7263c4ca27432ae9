//! Typed list operations over the archive's `items` sequence.

use std::ffi::OsStr;
use std::path::{Component, PathBuf};

use crate::location::LocationResolver;
use crate::types::error::{SidelistError, SidelistResult};
use crate::types::{
    FavoriteEntry, FavoriteItem, Value, FORCE_TEMPLATE_ICONS_KEY, ITEMS_KEY, PROPERTIES_KEY,
};

/// Final path component whose entry is written without `custom_properties`.
const DESKTOP_COMPONENT: &str = "Desktop";

/// Outcome of a batch add. Paths are attempted independently; a failure on
/// one never aborts the rest.
#[derive(Debug)]
pub struct BatchAdd {
    /// Items created, in call order.
    pub added: Vec<FavoriteItem>,
    /// Paths that failed, with the error each one hit.
    pub failures: Vec<(String, SidelistError)>,
}

impl BatchAdd {
    /// True when nothing succeeded and at least one path was attempted.
    pub fn all_failed(&self) -> bool {
        self.added.is_empty() && !self.failures.is_empty()
    }
}

/// Typed operations over a decoded archive.
///
/// The store holds no copy of the list. Every operation borrows the archive
/// value, reads or edits its `items` entry in place, and returns; the caller
/// owns the archive for the whole invocation and decides when to persist.
pub struct FavoriteStore<'a> {
    resolver: &'a dyn LocationResolver,
}

impl<'a> FavoriteStore<'a> {
    pub fn new(resolver: &'a dyn LocationResolver) -> Self {
        Self { resolver }
    }

    /// Resolve every stored item for display, in stored order.
    ///
    /// Entries that are not dictionaries, lack a data-typed location, or
    /// whose token the collaborator cannot decode are skipped. Historic
    /// writes by other tools produce such entries; they are not an error.
    pub fn list(&self, archive: &Value) -> SidelistResult<Vec<FavoriteEntry>> {
        let items = items_of(archive)?;
        let mut entries = Vec::with_capacity(items.len());
        for (index, stored) in items.iter().enumerate() {
            let Some(item) = FavoriteItem::from_value(stored) else {
                log::debug!("skipping item {}: no data-typed location", index);
                continue;
            };
            match self.resolver.decode_location(&item.location) {
                Ok(resolved) => entries.push(FavoriteEntry {
                    uuid: item.uuid,
                    path: resolved.path,
                    stale: resolved.stale,
                }),
                Err(e) => log::debug!("skipping item {}: {}", index, e),
            }
        }
        Ok(entries)
    }

    /// Add a favorite for `path`, appended at the end of the list.
    ///
    /// The path is normalized first; a favorite whose token resolves to the
    /// same path must not already exist. Does not persist anything.
    pub fn add(&self, archive: &mut Value, path: &str) -> SidelistResult<FavoriteItem> {
        let normalized = normalize_path(path)?;
        let token = self.resolver.encode_location(&normalized)?;

        let target = normalized.to_string_lossy().to_string();
        if self.find_by_path(archive, &target)?.is_some() {
            return Err(SidelistError::DuplicateFavorite(target));
        }

        // The Desktop entry is stored without a properties map: its presence
        // on that one entry suppresses the entry's display.
        let custom_properties = if normalized.file_name() == Some(OsStr::new(DESKTOP_COMPONENT)) {
            None
        } else {
            Some(Vec::new())
        };

        let item = FavoriteItem::new(token, custom_properties);
        items_mut(archive)?.push(item.to_value());
        Ok(item)
    }

    /// Add several favorites, each attempted independently.
    pub fn add_all(&self, archive: &mut Value, paths: &[String]) -> SidelistResult<BatchAdd> {
        // Surface a malformed archive once, up front; everything after this
        // is a per-path outcome.
        items_of(archive)?;

        let mut added = Vec::new();
        let mut failures = Vec::new();
        for path in paths {
            match self.add(archive, path) {
                Ok(item) => added.push(item),
                Err(e) => failures.push((path.clone(), e)),
            }
        }
        Ok(BatchAdd { added, failures })
    }

    /// Remove the first favorite whose token resolves to `path`.
    ///
    /// Returns whether a removal happened; no match is `false`, not an
    /// error. At most one item is removed even if duplicates exist.
    pub fn remove(&self, archive: &mut Value, path: &str) -> SidelistResult<bool> {
        let normalized = normalize_path(path)?;
        let target = normalized.to_string_lossy().to_string();
        match self.find_by_path(archive, &target)? {
            Some(index) => {
                items_mut(archive)?.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace the item sequence with an empty one. `properties` is not
    /// touched.
    pub fn clear(&self, archive: &mut Value) -> SidelistResult<()> {
        if archive.as_map().is_none() {
            return Err(SidelistError::FieldType {
                field: "root",
                expected: "dict",
            });
        }
        archive.set(ITEMS_KEY, Value::Sequence(Vec::new()));
        Ok(())
    }

    /// Index of the first stored item whose token resolves to `target`.
    fn find_by_path(&self, archive: &Value, target: &str) -> SidelistResult<Option<usize>> {
        let items = items_of(archive)?;
        for (index, stored) in items.iter().enumerate() {
            let Some(item) = FavoriteItem::from_value(stored) else {
                continue;
            };
            match self.resolver.decode_location(&item.location) {
                Ok(resolved) if resolved.path == target => return Ok(Some(index)),
                Ok(_) => {}
                Err(e) => log::debug!("skipping undecodable item {}: {}", index, e),
            }
        }
        Ok(None)
    }
}

/// Build the minimal valid archive a fresh container file starts from.
pub fn bootstrap_archive() -> Value {
    Value::Map(vec![
        (ITEMS_KEY.to_string(), Value::Sequence(Vec::new())),
        (
            PROPERTIES_KEY.to_string(),
            Value::Map(vec![(
                FORCE_TEMPLATE_ICONS_KEY.to_string(),
                Value::Boolean(true),
            )]),
        ),
    ])
}

/// Normalize a raw path argument to an absolute, lexically clean form.
///
/// `~` and `~/…` expand through `$HOME`; relative paths are joined to the
/// current directory; `.` components are dropped and `..` pops. No
/// filesystem canonicalization happens here; existence is the location
/// collaborator's concern.
pub fn normalize_path(raw: &str) -> SidelistResult<PathBuf> {
    if raw.is_empty() {
        return Err(SidelistError::PathUnresolvable {
            path: raw.to_string(),
            reason: "empty path".to_string(),
        });
    }

    let expanded = if raw == "~" || raw.starts_with("~/") {
        let home = std::env::var_os("HOME").ok_or_else(|| SidelistError::PathUnresolvable {
            path: raw.to_string(),
            reason: "HOME is not set".to_string(),
        })?;
        let mut path = PathBuf::from(home);
        if raw.len() > 2 {
            path.push(&raw[2..]);
        }
        path
    } else if raw.starts_with('~') {
        return Err(SidelistError::PathUnresolvable {
            path: raw.to_string(),
            reason: "~user expansion is not supported".to_string(),
        });
    } else {
        PathBuf::from(raw)
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|e| SidelistError::PathUnresolvable {
            path: raw.to_string(),
            reason: e.to_string(),
        })?;
        cwd.join(expanded)
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => cleaned.push(component.as_os_str()),
            Component::CurDir => {}
            // pop() at the root is a no-op, so `/..` stays `/`
            Component::ParentDir => {
                cleaned.pop();
            }
            Component::Normal(part) => cleaned.push(part),
        }
    }
    Ok(cleaned)
}

/// Borrow the archive's item sequence, validating its shape.
fn items_of(archive: &Value) -> SidelistResult<&Vec<Value>> {
    if archive.as_map().is_none() {
        return Err(SidelistError::FieldType {
            field: "root",
            expected: "dict",
        });
    }
    archive
        .get(ITEMS_KEY)
        .ok_or(SidelistError::MissingField(ITEMS_KEY))?
        .as_sequence()
        .ok_or(SidelistError::FieldType {
            field: ITEMS_KEY,
            expected: "array",
        })
}

/// Mutably borrow the archive's item sequence, validating its shape.
fn items_mut(archive: &mut Value) -> SidelistResult<&mut Vec<Value>> {
    if archive.as_map().is_none() {
        return Err(SidelistError::FieldType {
            field: "root",
            expected: "dict",
        });
    }
    match archive.get_mut(ITEMS_KEY) {
        Some(field) => field.as_sequence_mut().ok_or(SidelistError::FieldType {
            field: ITEMS_KEY,
            expected: "array",
        }),
        None => Err(SidelistError::MissingField(ITEMS_KEY)),
    }
}
