//! DSA item wire model and the typed view of its BDSA mapping metadata.
//!
//! Items arrive from the archive as JSON documents with a MongoDB-style `_id`,
//! a display name, an optional byte size, and a free-form `meta` map. The
//! local-to-BDSA mapping, when present, is nested at `meta.BDSA.bdsaLocal`.
//! The `meta` map is kept untyped so merge semantics match the server's
//! shallow-overlay behaviour exactly; [`BdsaLocal`] is a typed projection for
//! code that wants the mapping fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A slide/file record fetched from the archive.
///
/// `size` is signed: the archive should never produce a negative size, but a
/// malformed record must be representable so the validator can report it
/// rather than the deserializer rejecting the whole page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Server-assigned identifier, unique within a DSA instance.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display/file name.
    pub name: String,

    /// Size in bytes, when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    /// Free-form metadata map; BDSA mapping lives at `meta.BDSA.bdsaLocal`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl Item {
    /// Creates an item with the given identifier and name and no metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: None,
            meta: Map::new(),
        }
    }

    /// The raw `meta.BDSA.bdsaLocal` value, if any.
    pub fn bdsa_local_raw(&self) -> Option<&Value> {
        self.meta.get("BDSA")?.get("bdsaLocal")
    }

    /// Typed view of the BDSA mapping metadata.
    ///
    /// Returns `None` when the mapping is absent or does not deserialize;
    /// use [`crate::validation::validate_item`] to find out why.
    pub fn bdsa_local(&self) -> Option<BdsaLocal> {
        let raw = self.bdsa_local_raw()?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// The mapped BDSA case identifier, if one is attached and non-empty.
    pub fn bdsa_case_id(&self) -> Option<&str> {
        match self.bdsa_local_raw()?.get("bdsaCaseId")? {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// The local case identifier, if one is attached and non-empty.
    pub fn local_case_id(&self) -> Option<&str> {
        match self.bdsa_local_raw()?.get("localCaseId")? {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Replaces the `meta.BDSA.bdsaLocal` subtree, creating parents as needed.
    pub fn set_bdsa_local(&mut self, local: &BdsaLocal) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(local)?;
        let bdsa = self
            .meta
            .entry("BDSA".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(obj) = bdsa {
            obj.insert("bdsaLocal".to_string(), value);
        } else {
            let mut obj = Map::new();
            obj.insert("bdsaLocal".to_string(), value);
            *bdsa = Value::Object(obj);
        }
        Ok(())
    }
}

/// Typed form of the `meta.BDSA.bdsaLocal` mapping structure.
///
/// Field names follow the wire format used by the schema-wrangler tooling;
/// note the historical `localStainID` capitalisation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BdsaLocal {
    /// Institution-qualified case identifier (`BDSA-###-####`), once mapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bdsa_case_id: Option<String>,

    /// Region protocol identifiers assigned to this slide.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bdsa_region_protocol: Vec<String>,

    /// Stain protocol identifiers assigned to this slide.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bdsa_stain_protocol: Vec<String>,

    /// Case identifier in the contributing institution's own scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_case_id: Option<String>,

    /// Region label as recorded locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_region_id: Option<String>,

    /// Stain label as recorded locally.
    #[serde(rename = "localStainID", default, skip_serializing_if = "Option::is_none")]
    pub local_stain_id: Option<String>,

    /// When the mapping was last touched (ISO-8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    /// Tool that wrote the mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
