//! Filtering and tallying a batch of items ahead of a sync run.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

use crate::error::{SyncError, SyncResult};
use crate::item::Item;

/// Optional filters applied to each item before it is processed.
#[derive(Clone, Debug, Default)]
pub struct SyncOptions {
    /// Keep only items whose name matches.
    pub include: Option<Regex>,
    /// Drop items whose name matches; applied after `include`.
    pub exclude: Option<Regex>,
    /// Drop items smaller than this many bytes.
    pub min_size: Option<i64>,
    /// Drop items larger than this many bytes.
    pub max_size: Option<i64>,
}

impl SyncOptions {
    /// Options with no filters: every item survives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the include-name pattern.
    pub fn include_pattern(mut self, pattern: &str) -> SyncResult<Self> {
        self.include = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Sets the exclude-name pattern.
    pub fn exclude_pattern(mut self, pattern: &str) -> SyncResult<Self> {
        self.exclude = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Sets the size bounds, either end optional.
    pub fn size_bounds(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }
}

/// Counters for one processing pass. All counts are final regardless of
/// whether the pass succeeded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatistics {
    /// Items supplied to the pass.
    pub total: usize,
    /// Items that survived filtering and processing.
    pub processed: usize,
    /// Items that failed with a per-item error.
    pub error_items: usize,
    /// Distinct patients that already carry a BDSA case identifier.
    pub mapped_cases: usize,
    /// Distinct patients with no BDSA case identifier yet.
    pub unmapped_cases: usize,
}

/// Result of [`process_for_sync`].
#[derive(Clone, Debug, Default)]
pub struct SyncOutcome {
    /// True iff no per-item errors occurred.
    pub success: bool,
    /// Items ready to be persisted through the API client.
    pub processed_items: Vec<Item>,
    /// One line per failed item, keyed by item name.
    pub errors: Vec<String>,
    /// Final counters for the pass.
    pub statistics: SyncStatistics,
}

/// Filters and tallies a batch of items for synchronization.
///
/// Items are visited in input order. Filtered-out items (name pattern or
/// size bound) are skipped silently; they are neither processed nor counted
/// as errors. For each survivor the extractor derives a patient identifier
/// best-effort: the first time a patient is seen, the mapped/unmapped case
/// counters tick depending on whether a BDSA case identifier is already
/// attached. An extractor failure is recorded against the item's name and
/// never aborts the rest of the batch.
pub fn process_for_sync<F>(items: &[Item], options: &SyncOptions, extract_patient_id: F) -> SyncOutcome
where
    F: Fn(&Item) -> SyncResult<Option<String>>,
{
    let mut outcome = SyncOutcome {
        statistics: SyncStatistics {
            total: items.len(),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut seen_patients: HashSet<String> = HashSet::new();

    for item in items {
        if let Some(include) = &options.include {
            if !include.is_match(&item.name) {
                continue;
            }
        }
        if let Some(exclude) = &options.exclude {
            if exclude.is_match(&item.name) {
                continue;
            }
        }
        if let (Some(min), Some(size)) = (options.min_size, item.size) {
            if size < min {
                continue;
            }
        }
        if let (Some(max), Some(size)) = (options.max_size, item.size) {
            if size > max {
                continue;
            }
        }

        match extract_patient_id(item) {
            Ok(Some(patient_id)) => {
                if seen_patients.insert(patient_id) {
                    if item.bdsa_case_id().is_some() {
                        outcome.statistics.mapped_cases += 1;
                    } else {
                        outcome.statistics.unmapped_cases += 1;
                    }
                }
            }
            Ok(None) => {
                tracing::debug!(item = %item.name, "no patient ID derivable; item kept");
            }
            Err(err) => {
                tracing::warn!(item = %item.name, error = %err, "item failed during sync processing");
                outcome
                    .errors
                    .push(format!("failed to process item '{}': {err}", item.name));
                outcome.statistics.error_items += 1;
                continue;
            }
        }

        outcome.processed_items.push(item.clone());
        outcome.statistics.processed += 1;
    }

    outcome.success = outcome.errors.is_empty();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_extractor(item: &Item) -> SyncResult<Option<String>> {
        Ok(crate::naming::extract_patient_id(item))
    }

    fn sized(id: &str, name: &str, size: i64) -> Item {
        let mut item = Item::new(id, name);
        item.size = Some(size);
        item
    }

    #[test]
    fn processes_everything_without_filters() {
        let items = vec![
            Item::new("a", "550058_2_Sil_1.mrxs"),
            Item::new("b", "991234_1_Tau_1.mrxs"),
        ];
        let outcome = process_for_sync(&items, &SyncOptions::new(), ok_extractor);
        assert!(outcome.success);
        assert_eq!(outcome.processed_items.len(), 2);
        assert_eq!(outcome.statistics.total, 2);
        assert_eq!(outcome.statistics.processed, 2);
        assert_eq!(outcome.statistics.error_items, 0);
        assert_eq!(outcome.statistics.unmapped_cases, 2);
    }

    #[test]
    fn include_and_exclude_patterns_filter_by_name() {
        let items = vec![
            Item::new("a", "550058_2_Sil_1.mrxs"),
            Item::new("b", "thumbnail.png"),
            Item::new("c", "991234_1_Tau_1.mrxs"),
        ];
        let options = SyncOptions::new()
            .include_pattern(r"\.mrxs$")
            .expect("valid pattern")
            .exclude_pattern("Tau")
            .expect("valid pattern");

        let outcome = process_for_sync(&items, &options, ok_extractor);
        assert!(outcome.success);
        assert_eq!(outcome.processed_items.len(), 1);
        assert_eq!(outcome.processed_items[0].id, "a");
        // Filtered items are not errors.
        assert_eq!(outcome.statistics.error_items, 0);
    }

    #[test]
    fn size_bounds_filter_when_set() {
        let items = vec![
            sized("a", "550058_2_Sil_1.mrxs", 100),
            sized("b", "550058_3_HE_1.mrxs", 5_000),
            sized("c", "550058_4_Tau_1.mrxs", 100_000),
            // No size reported: bounds do not apply.
            Item::new("d", "550058_5_Syn_1.mrxs"),
        ];
        let options = SyncOptions::new().size_bounds(Some(1_000), Some(50_000));

        let outcome = process_for_sync(&items, &options, ok_extractor);
        let kept: Vec<&str> = outcome.processed_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(kept, vec!["b", "d"]);
    }

    #[test]
    fn mapped_and_unmapped_cases_count_distinct_patients() {
        let mut mapped = Item::new("a", "550058_2_Sil_1.mrxs");
        mapped
            .meta
            .insert(
                "BDSA".to_string(),
                serde_json::json!({ "bdsaLocal": { "bdsaCaseId": "BDSA-501-0058" } }),
            );
        let items = vec![
            mapped.clone(),
            Item::new("b", "991234_1_Tau_1.mrxs"),
            Item::new("c", "991234_2_HE_1.mrxs"),
        ];

        let outcome = process_for_sync(&items, &SyncOptions::new(), ok_extractor);
        assert_eq!(outcome.statistics.mapped_cases, 1);
        // Two items, one patient.
        assert_eq!(outcome.statistics.unmapped_cases, 1);
        assert_eq!(outcome.statistics.processed, 3);
    }

    #[test]
    fn one_bad_item_never_blocks_the_batch() {
        let items = vec![
            Item::new("a", "550058_2_Sil_1.mrxs"),
            Item::new("b", "broken.mrxs"),
            Item::new("c", "991234_1_Tau_1.mrxs"),
        ];
        let extractor = |item: &Item| -> SyncResult<Option<String>> {
            if item.name.starts_with("broken") {
                return Err(SyncError::PatientIdExtraction {
                    item_name: item.name.clone(),
                    reason: "corrupt mapping".to_string(),
                });
            }
            Ok(crate::naming::extract_patient_id(item))
        };

        let outcome = process_for_sync(&items, &SyncOptions::new(), extractor);
        assert!(!outcome.success);
        assert_eq!(outcome.statistics.error_items, 1);
        assert_eq!(outcome.processed_items.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("broken.mrxs"));
        // Statistics are populated even when the pass fails.
        assert_eq!(outcome.statistics.total, 3);
        assert_eq!(outcome.statistics.processed, 2);
    }

    #[test]
    fn invalid_pattern_is_a_caller_error() {
        let err = SyncOptions::new()
            .include_pattern("([unclosed")
            .expect_err("bad regex should be rejected");
        assert!(matches!(err, SyncError::Pattern(_)));
    }
}
