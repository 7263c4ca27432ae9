//! The favorite item, one entry in the ordered list.

use serde::Serialize;
use uuid::Uuid;

use super::{ITEM_LOCATION_KEY, ITEM_PROPERTIES_KEY, ITEM_UUID_KEY, ITEM_VISIBILITY_KEY};
use crate::types::value::Value;

/// Visibility value for a normally displayed item.
pub const VISIBLE: i64 = 0;

/// One favorite-location entry.
///
/// `custom_properties` is optional on purpose: the entry for a path whose
/// final component is `Desktop` must be written without it, since the
/// presence of the properties map on that entry suppresses its display.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteItem {
    /// Unique identifier (UUID v4 string).
    pub uuid: String,
    /// Opaque location token produced by the collaborator.
    pub location: Vec<u8>,
    /// Display visibility (0 = visible).
    pub visibility: i64,
    /// Free-form per-item properties; absent for the Desktop entry.
    pub custom_properties: Option<Vec<(String, Value)>>,
}

impl FavoriteItem {
    /// Create a new visible item with a fresh UUID and the given token.
    pub fn new(location: Vec<u8>, custom_properties: Option<Vec<(String, Value)>>) -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            location,
            visibility: VISIBLE,
            custom_properties,
        }
    }

    /// Render this item as the dictionary stored in the archive.
    pub fn to_value(&self) -> Value {
        let mut pairs = vec![
            (ITEM_UUID_KEY.to_string(), Value::Text(self.uuid.clone())),
            (
                ITEM_LOCATION_KEY.to_string(),
                Value::Blob(self.location.clone()),
            ),
            (
                ITEM_VISIBILITY_KEY.to_string(),
                Value::Integer(self.visibility),
            ),
        ];
        if let Some(props) = &self.custom_properties {
            pairs.push((ITEM_PROPERTIES_KEY.to_string(), Value::Map(props.clone())));
        }
        Value::Map(pairs)
    }

    /// Read an item back out of a stored dictionary.
    ///
    /// Returns None when the entry is not a dictionary or lacks a blob-typed
    /// location; such entries are tolerated in the archive (historic writes
    /// by other tools) and skipped by callers.
    pub fn from_value(value: &Value) -> Option<Self> {
        let location = value.get(ITEM_LOCATION_KEY)?.as_blob()?.to_vec();
        let uuid = value
            .get(ITEM_UUID_KEY)
            .and_then(Value::as_text)
            .unwrap_or_default()
            .to_string();
        let visibility = value
            .get(ITEM_VISIBILITY_KEY)
            .and_then(Value::as_integer)
            .unwrap_or(VISIBLE);
        let custom_properties = value
            .get(ITEM_PROPERTIES_KEY)
            .and_then(Value::as_map)
            .cloned();
        Some(Self {
            uuid,
            location,
            visibility,
            custom_properties,
        })
    }
}

/// One row of `list` output: the item resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteEntry {
    /// The stored item's UUID.
    pub uuid: String,
    /// Path the collaborator resolved the token to.
    pub path: String,
    /// Whether the collaborator flagged the target as possibly moved.
    pub stale: bool,
}
