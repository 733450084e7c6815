//! Structural validation for items, configs, templates, and batches.
//!
//! Findings are data, not errors: every validator returns a
//! [`ValidationReport`] whose `errors` decide validity and whose `warnings`
//! are purely advisory. Nothing here panics or returns `Err` — malformed
//! input is exactly what these functions exist to describe.
//!
//! Single-rule format checks are exposed as named predicates
//! ([`is_bdsa_id`], [`is_valid_institution_id`], [`is_valid_case_id`]) so new
//! identifier formats can be added without touching the aggregate validators.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::constants::{BATCH_WARNING_SIZE, LARGE_FILE_BYTES, MAX_NAME_LEN, RISKY_NAME_CHARS};
use crate::item::Item;
use crate::naming::template_placeholders;
use crate::SyncConfig;
use bdsa_types::{BdsaCaseId, InstitutionId, LocalCaseId};

/// Outcome of a validation pass.
///
/// `valid` is true iff `errors` is empty; warnings never affect validity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Builds a report from collected findings, deriving the `valid` flag.
    pub fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Exact-match test against the `BDSA-###-####` case identifier format.
pub fn is_bdsa_id(id: &str) -> bool {
    BdsaCaseId::is_valid(id)
}

/// True iff `id` is a 3-digit institution code.
pub fn is_valid_institution_id(id: &str) -> bool {
    InstitutionId::is_valid(id)
}

/// True iff `id` is a plausible local case identifier
/// (letters, digits, hyphens; case-insensitive).
pub fn is_valid_case_id(id: &str) -> bool {
    LocalCaseId::is_valid(id)
}

/// Validates a single item record.
///
/// Errors: missing identifier or name, negative size, over-long name,
/// malformed BDSA case identifier, protocol fields that are not lists.
/// Warnings: zero or very large size, risky filename characters, a local
/// case identifier with no mapped BDSA case identifier.
pub fn validate_item(item: &Item) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if item.id.trim().is_empty() {
        errors.push("item is missing an identifier".to_string());
    }

    if item.name.trim().is_empty() {
        errors.push("item is missing a name".to_string());
    } else {
        if item.name.chars().count() > MAX_NAME_LEN {
            errors.push(format!("item name exceeds {MAX_NAME_LEN} characters"));
        }
        if item.name.contains(RISKY_NAME_CHARS) {
            warnings.push(format!(
                "item name '{}' contains characters that may be unsafe in file names",
                item.name
            ));
        }
    }

    match item.size {
        Some(size) if size < 0 => {
            errors.push(format!("item size cannot be negative (got {size})"));
        }
        Some(0) => {
            warnings.push("item size is zero".to_string());
        }
        Some(size) if size > LARGE_FILE_BYTES => {
            warnings.push(format!("item size {size} exceeds 10 GiB"));
        }
        _ => {}
    }

    if let Some(local) = item.bdsa_local_raw() {
        validate_bdsa_local(local, &mut errors, &mut warnings);
    }

    ValidationReport::from_findings(errors, warnings)
}

/// Checks the `meta.BDSA.bdsaLocal` subtree of an item.
fn validate_bdsa_local(local: &Value, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let Some(local) = local.as_object() else {
        errors.push("bdsaLocal mapping must be an object".to_string());
        return;
    };

    let bdsa_case_id = match local.get("bdsaCaseId") {
        Some(Value::String(s)) if !s.is_empty() => {
            if !is_bdsa_id(s) {
                errors.push(format!(
                    "bdsaCaseId '{s}' does not match the BDSA-###-#### format"
                ));
            }
            Some(s.as_str())
        }
        Some(Value::String(_)) | Some(Value::Null) | None => None,
        Some(other) => {
            errors.push(format!("bdsaCaseId must be a string, got {other}"));
            None
        }
    };

    for field in ["bdsaStainProtocol", "bdsaRegionProtocol"] {
        if let Some(value) = local.get(field) {
            if !value.is_array() {
                errors.push(format!("{field} must be a list"));
            }
        }
    }

    let has_local_case = matches!(local.get("localCaseId"), Some(Value::String(s)) if !s.is_empty());
    if has_local_case && bdsa_case_id.is_none() {
        warnings.push("item has a local case ID but no mapped BDSA case ID".to_string());
    }
}

/// Validates a sync configuration.
///
/// Source and target folder identifiers must be non-empty and distinct; the
/// naming template must be non-empty and pass [`validate_naming_template`],
/// whose findings are folded into the config's own lists.
pub fn validate_sync_config(config: &SyncConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let source = config.source_folder_id.trim();
    let target = config.target_folder_id.trim();

    if source.is_empty() {
        errors.push("source folder ID is required".to_string());
    }
    if target.is_empty() {
        errors.push("target folder ID is required".to_string());
    }
    if !source.is_empty() && source == target {
        errors.push("source and target folders must differ".to_string());
    }

    let template_report = validate_naming_template(&config.naming_template);
    errors.extend(template_report.errors);
    warnings.extend(template_report.warnings);

    ValidationReport::from_findings(errors, warnings)
}

/// Validates a naming template against the placeholder grammar.
///
/// An empty template is an immediate error. Otherwise the brace counts must
/// balance and every `{name}` placeholder must come from the fixed variable
/// whitelist; a template without `{patientId}` is flagged with a warning
/// because generated names may then collide across patients.
pub fn validate_naming_template(template: &str) -> ValidationReport {
    if template.trim().is_empty() {
        return ValidationReport::from_findings(
            vec!["naming template cannot be empty".to_string()],
            Vec::new(),
        );
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let opens = template.matches('{').count();
    let closes = template.matches('}').count();
    if opens != closes {
        errors.push("unbalanced braces in naming template".to_string());
    }

    let mut saw_patient_id = false;
    for name in template_placeholders(template) {
        if name == "patientId" {
            saw_patient_id = true;
        }
        if !crate::constants::TEMPLATE_VARIABLES.contains(&name) {
            errors.push(format!("unknown template variable: '{name}'"));
        }
    }

    if !saw_patient_id {
        warnings.push(
            "template does not include {patientId}; generated names may collide across patients"
                .to_string(),
        );
    }

    ValidationReport::from_findings(errors, warnings)
}

/// Validates every item in a batch before a bulk operation.
///
/// Item-level findings are aggregated: a failing item contributes one error
/// line carrying its index, name, and joined sub-errors; every item warning
/// is re-prefixed with its index. An empty batch and a batch over
/// [`BATCH_WARNING_SIZE`] items are advisory, not invalid.
pub fn validate_batch(items: &[Item], operation: &str) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if items.is_empty() {
        warnings.push(format!("no items to {operation}"));
    } else if items.len() > BATCH_WARNING_SIZE {
        warnings.push(format!(
            "large batch of {} items; consider splitting the {operation}",
            items.len()
        ));
    }

    for (index, item) in items.iter().enumerate() {
        let report = validate_item(item);
        if !report.valid {
            let name = if item.name.trim().is_empty() {
                "unnamed"
            } else {
                item.name.as_str()
            };
            errors.push(format!(
                "item {index} ({name}): {}",
                report.errors.join("; ")
            ));
        }
        for warning in report.warnings {
            warnings.push(format!("item {index}: {warning}"));
        }
    }

    ValidationReport::from_findings(errors, warnings)
}

static RISKY_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("risky-chars pattern is valid"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static UNDERSCORE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("underscore pattern is valid"));

/// Rewrites a name so it is safe for file and folder use.
///
/// Risky characters and whitespace runs become `_`, repeated underscores
/// collapse to one, leading/trailing underscores are trimmed, and the result
/// is capped at [`MAX_NAME_LEN`] characters. Total and idempotent:
/// `sanitize_name(sanitize_name(x)) == sanitize_name(x)` for every input.
pub fn sanitize_name(name: &str) -> String {
    let replaced = RISKY_CHARS_RE.replace_all(name, "_");
    let replaced = WHITESPACE_RE.replace_all(&replaced, "_");
    let collapsed = UNDERSCORE_RUN_RE.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');
    let truncated: String = trimmed.chars().take(MAX_NAME_LEN).collect();
    // Truncation can expose a trailing separator; trim again so the
    // function stays idempotent.
    truncated.trim_end_matches('_').to_string()
}
