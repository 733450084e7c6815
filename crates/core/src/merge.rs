//! Layering update fields and a synchronization stamp onto an item.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::constants::SYNC_VERSION;
use crate::item::Item;

/// Fields to overlay onto an item. Absent fields leave the original value
/// untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub size: Option<i64>,
    /// Metadata keys to overlay; each present key replaces the original's
    /// key wholesale (one-level merge, no deep merging).
    pub meta: Option<Map<String, Value>>,
}

/// Returns a new item equal to `original` with `updates` overlaid and a
/// fresh `syncMetadata` stamp.
///
/// Top-level fields are overlaid shallowly; `meta` is merged one level deep
/// (every key present in the update replaces the original's key). The
/// `syncMetadata` key is always recomputed: it records the original's
/// identifier and name, the current UTC wall-clock time in ISO-8601 form,
/// and the sync version tag. The original is never mutated, and the
/// `syncedAt` value is not reproducible across calls.
pub fn merge_with_sync_stamp(original: &Item, updates: &ItemUpdate) -> Item {
    let mut meta = original.meta.clone();
    if let Some(update_meta) = &updates.meta {
        for (key, value) in update_meta {
            meta.insert(key.clone(), value.clone());
        }
    }
    meta.insert(
        "syncMetadata".to_string(),
        json!({
            "originalId": original.id,
            "originalName": original.name,
            "syncedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "syncVersion": SYNC_VERSION,
        }),
    );

    Item {
        id: updates.id.clone().unwrap_or_else(|| original.id.clone()),
        name: updates.name.clone().unwrap_or_else(|| original.name.clone()),
        size: updates.size.or(original.size),
        meta,
    }
}
