//! Sync run configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one sync run between two DSA folders.
///
/// Structural checks live in
/// [`crate::validation::validate_sync_config`]; this struct only carries the
/// values, so a config read from untrusted input can be inspected before use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Folder the items are read from.
    pub source_folder_id: String,

    /// Folder the items are written to. Must differ from the source.
    pub target_folder_id: String,

    /// Naming template applied to synced items, e.g. `{patientId}_{stain}`.
    pub naming_template: String,
}
