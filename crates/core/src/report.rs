//! Comparing source, target, and processed item sets after a sync run.

use std::collections::HashSet;

use serde::Serialize;

use crate::item::Item;

/// Headline counts for a sync report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub source_items: usize,
    pub target_items: usize,
    pub processed_items: usize,
    pub duplicate_items: usize,
}

/// Summary of a sync run, with the concrete duplicate and missing items.
///
/// Borrows from the input slices: `duplicates` reference target items,
/// `missing` reference source items.
#[derive(Clone, Debug, Serialize)]
pub struct SyncReport<'a> {
    pub summary: ReportSummary,
    /// Target items whose name also appears in the source.
    pub duplicates: Vec<&'a Item>,
    /// Source items whose name is absent from the target.
    pub missing: Vec<&'a Item>,
}

/// Compares the three item sets by name and summarizes the differences.
///
/// Comparison is by name only, not identifier: two distinct items sharing a
/// name are treated as the same entity. That is intentional behaviour carried
/// over from the existing tooling, kept for compatibility even though it can
/// conflate renamed-but-distinct slides.
pub fn generate_report<'a>(
    source_items: &'a [Item],
    target_items: &'a [Item],
    processed_items: &[Item],
) -> SyncReport<'a> {
    let source_names: HashSet<&str> = source_items.iter().map(|i| i.name.as_str()).collect();
    let target_names: HashSet<&str> = target_items.iter().map(|i| i.name.as_str()).collect();

    let duplicates: Vec<&Item> = target_items
        .iter()
        .filter(|item| source_names.contains(item.name.as_str()))
        .collect();

    let missing: Vec<&Item> = source_items
        .iter()
        .filter(|item| !target_names.contains(item.name.as_str()))
        .collect();

    SyncReport {
        summary: ReportSummary {
            source_items: source_items.len(),
            target_items: target_items.len(),
            processed_items: processed_items.len(),
            duplicate_items: duplicates.len(),
        },
        duplicates,
        missing,
    }
}
