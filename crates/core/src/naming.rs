//! Naming conventions: template placeholders, standardized names, and the
//! filename formats used by contributing labs.
//!
//! Slide filenames carry local case/region/stain identity in a handful of
//! historical layouts. [`parse_filename`] tries each layout in order and
//! returns the first match; [`extract_patient_id`] layers the mapped BDSA
//! case identifier and `bdsaLocal` fields on top of that as a best-effort
//! derivation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::TEMPLATE_VARIABLES;
use crate::item::Item;
use crate::validation::sanitize_name;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

// Filename layouts, tried in order. `\w` deliberately matches underscores in
// the space formats, mirroring how lab exports were parsed historically.
static UNDERSCORE_FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)_(\d+)_([A-Za-z0-9_-]+)_(\d+)$").expect("underscore format is valid")
});
static SPACE_FORMAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+(\w+)\s+(\w+)_(\w+)$").expect("space format is valid"));
static EXTENDED_FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s+(\w+)\s+(\w+)_(\w+)_(\w+)$").expect("extended format is valid")
});

/// Placeholder names appearing in a template, in order of appearance.
pub(crate) fn template_placeholders(template: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Identity fields recovered from a slide filename.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Numeric case identifier in the contributing lab's scheme.
    pub local_case_id: String,
    /// Region slot number (underscore format only).
    pub region_number: Option<String>,
    /// Region label (space formats only).
    pub local_region_id: Option<String>,
    /// Stain abbreviation as written in the filename.
    pub local_stain_id: String,
    /// Slide number within the case (underscore format only).
    pub slide_number: Option<String>,
    /// Export image type segment (space formats only).
    pub image_type: Option<String>,
}

/// Parses a slide filename into its identity fields.
///
/// The extension is dropped at the first `.`, then three layouts are tried
/// in order: `550058_2_Sil_1` (underscore), `20232824 B TDP43_LabelArea`
/// (space), and the extended space layout with a trailing variant segment.
/// Returns `None` when no layout matches.
pub fn parse_filename(filename: &str) -> Option<ParsedFilename> {
    let base = filename.split('.').next().unwrap_or(filename);

    if let Some(caps) = UNDERSCORE_FORMAT_RE.captures(base) {
        return Some(ParsedFilename {
            local_case_id: caps[1].to_string(),
            region_number: Some(caps[2].to_string()),
            local_stain_id: caps[3].to_string(),
            slide_number: Some(caps[4].to_string()),
            ..Default::default()
        });
    }

    if let Some(caps) = SPACE_FORMAT_RE.captures(base) {
        return Some(ParsedFilename {
            local_case_id: caps[1].to_string(),
            local_region_id: Some(caps[2].to_string()),
            local_stain_id: caps[3].to_string(),
            image_type: Some(caps[4].to_string()),
            ..Default::default()
        });
    }

    if let Some(caps) = EXTENDED_FORMAT_RE.captures(base) {
        return Some(ParsedFilename {
            local_case_id: caps[1].to_string(),
            local_region_id: Some(caps[2].to_string()),
            local_stain_id: caps[3].to_string(),
            image_type: Some(format!("{}_{}", &caps[4], &caps[5])),
            ..Default::default()
        });
    }

    None
}

/// Maps a filename stain abbreviation to its canonical stain name.
///
/// Unknown abbreviations pass through unchanged.
pub fn canonical_stain_name(abbrev: &str) -> &str {
    match abbrev {
        "Sil" => "Modified Bielchowski",
        "AmyB" => "amyB",
        "HE" => "H&E",
        "Syn" => "Synuclein",
        // LFB-PAS slides are filed under plain LFB.
        "LFB-PAS" => "LFB",
        // Thioflavin S currently maps onto the Tau protocol.
        "Thio" => "Tau",
        other => other,
    }
}

/// Best-effort patient identifier derivation for an item.
///
/// Prefers the mapped BDSA case identifier, then the local case identifier
/// from `bdsaLocal`, then the case segment parsed from the filename.
/// Deterministic for a given item; `None` when nothing can be derived.
pub fn extract_patient_id(item: &Item) -> Option<String> {
    if let Some(case_id) = item.bdsa_case_id() {
        return Some(case_id.to_string());
    }
    if let Some(local) = item.local_case_id() {
        return Some(local.to_string());
    }
    parse_filename(&item.name).map(|parsed| parsed.local_case_id)
}

/// Renders a standardized name for an item from a naming template.
///
/// Each `{variable}` placeholder from the fixed whitelist is filled from the
/// item: patient identity via [`extract_patient_id`], region/stain from the
/// `bdsaLocal` mapping (falling back to the first protocol entry), the
/// institution code from the BDSA case identifier, the caller-supplied
/// `index`, today's UTC date as `YYYYMMDD`, and the sanitized original name
/// stem. Unknown or unfillable placeholders resolve to the empty string, and
/// the final result is passed through [`sanitize_name`].
pub fn generate_standardized_name(item: &Item, template: &str, index: usize) -> String {
    let local = item.bdsa_local().unwrap_or_default();

    let filled = PLACEHOLDER_RE.replace_all(template, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        if !TEMPLATE_VARIABLES.contains(&name) {
            return String::new();
        }
        match name {
            "patientId" => extract_patient_id(item).unwrap_or_default(),
            "region" => local
                .local_region_id
                .clone()
                .or_else(|| local.bdsa_region_protocol.first().cloned())
                .unwrap_or_default(),
            "stain" => local
                .local_stain_id
                .clone()
                .or_else(|| local.bdsa_stain_protocol.first().cloned())
                .unwrap_or_default(),
            "slideType" => item
                .name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default(),
            "institutionId" => item
                .bdsa_case_id()
                .and_then(|id| bdsa_types::BdsaCaseId::parse(id).ok())
                .map(|id| id.institution_code().to_string())
                .unwrap_or_default(),
            "index" => index.to_string(),
            "timestamp" => chrono::Utc::now().format("%Y%m%d").to_string(),
            "originalName" => item
                .name
                .split('.')
                .next()
                .unwrap_or(&item.name)
                .to_string(),
            _ => String::new(),
        }
    });

    sanitize_name(&filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapped_item() -> Item {
        let mut item = Item::new("65a1f", "550058_2_Sil_1.mrxs");
        item.meta.insert(
            "BDSA".to_string(),
            json!({
                "bdsaLocal": {
                    "bdsaCaseId": "BDSA-501-0058",
                    "localCaseId": "550058",
                    "localRegionId": "Midbrain",
                    "localStainID": "Modified Bielchowski"
                }
            }),
        );
        item
    }

    #[test]
    fn parses_underscore_format() {
        let parsed = parse_filename("550058_2_Sil_1.mrxs").expect("should match");
        assert_eq!(parsed.local_case_id, "550058");
        assert_eq!(parsed.region_number.as_deref(), Some("2"));
        assert_eq!(parsed.local_stain_id, "Sil");
        assert_eq!(parsed.slide_number.as_deref(), Some("1"));
        assert!(parsed.local_region_id.is_none());
    }

    #[test]
    fn parses_space_format() {
        let parsed =
            parse_filename("20232824 B TDP43_LabelArea_Image.optimized.tiff").expect("should match");
        assert_eq!(parsed.local_case_id, "20232824");
        assert_eq!(parsed.local_region_id.as_deref(), Some("B"));
    }

    #[test]
    fn unrecognized_filename_yields_nothing() {
        assert!(parse_filename("notes.txt").is_none());
        assert!(parse_filename("").is_none());
    }

    #[test]
    fn stain_abbreviations_map_to_canonical_names() {
        assert_eq!(canonical_stain_name("Sil"), "Modified Bielchowski");
        assert_eq!(canonical_stain_name("HE"), "H&E");
        assert_eq!(canonical_stain_name("LFB-PAS"), "LFB");
        assert_eq!(canonical_stain_name("Thio"), "Tau");
        assert_eq!(canonical_stain_name("Tau"), "Tau");
        assert_eq!(canonical_stain_name("SomethingNew"), "SomethingNew");
    }

    #[test]
    fn extractor_prefers_mapped_case_id() {
        assert_eq!(
            extract_patient_id(&mapped_item()).as_deref(),
            Some("BDSA-501-0058")
        );
    }

    #[test]
    fn extractor_falls_back_to_local_then_filename() {
        let mut item = Item::new("a", "550058_2_Sil_1.mrxs");
        item.meta.insert(
            "BDSA".to_string(),
            json!({ "bdsaLocal": { "localCaseId": "990001" } }),
        );
        assert_eq!(extract_patient_id(&item).as_deref(), Some("990001"));

        let bare = Item::new("b", "550058_2_Sil_1.mrxs");
        assert_eq!(extract_patient_id(&bare).as_deref(), Some("550058"));

        let opaque = Item::new("c", "mystery.svs");
        assert!(extract_patient_id(&opaque).is_none());
    }

    #[test]
    fn standardized_name_fills_known_placeholders() {
        let name = generate_standardized_name(&mapped_item(), "{patientId}_{region}_{stain}", 0);
        assert_eq!(name, "BDSA-501-0058_Midbrain_Modified_Bielchowski");
    }

    #[test]
    fn standardized_name_resolves_institution_and_index() {
        let name = generate_standardized_name(&mapped_item(), "{institutionId}-{index}", 7);
        assert_eq!(name, "501-7");
    }

    #[test]
    fn standardized_name_timestamp_is_a_date_stamp() {
        let name = generate_standardized_name(&mapped_item(), "{timestamp}", 0);
        assert_eq!(name.len(), 8);
        assert!(name.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn unfillable_placeholders_resolve_to_empty() {
        let bare = Item::new("a", "mystery.svs");
        let name = generate_standardized_name(&bare, "{patientId}_{originalName}", 0);
        assert_eq!(name, "mystery");
    }
}
