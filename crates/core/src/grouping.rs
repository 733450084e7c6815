//! Grouping items into per-patient collections.

use std::collections::HashMap;

use crate::item::Item;

/// Items belonging to one patient, in first-seen order.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientGroup {
    /// Derived patient identifier shared by every item in the group.
    pub patient_id: String,
    /// Target folder assigned later by the API-client collaborator;
    /// always empty when the group is created.
    pub target_folder_id: Option<String>,
    /// The patient's items, in the order they appeared in the input.
    pub items: Vec<Item>,
}

/// Result of a grouping pass: the groups plus anything that was skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupingOutcome {
    /// Groups keyed by derived patient identifier.
    pub groups: HashMap<String, PatientGroup>,
    /// One line per skipped item; grouping itself never fails.
    pub diagnostics: Vec<String>,
}

/// Groups items by the patient identifier the extractor derives for them.
///
/// Items the extractor cannot place (`None`) are skipped and recorded in the
/// outcome's diagnostics rather than failing the whole pass. The first item
/// seen for a patient creates that patient's group with an empty
/// target-folder placeholder.
pub fn group_by_patient<F>(items: &[Item], extract_patient_id: F) -> GroupingOutcome
where
    F: Fn(&Item) -> Option<String>,
{
    let mut outcome = GroupingOutcome::default();

    for item in items {
        let Some(patient_id) = extract_patient_id(item) else {
            tracing::debug!(item = %item.name, "skipping item with no derivable patient ID");
            outcome
                .diagnostics
                .push(format!("no patient ID could be derived for '{}'", item.name));
            continue;
        };

        outcome
            .groups
            .entry(patient_id.clone())
            .or_insert_with(|| PatientGroup {
                patient_id,
                target_folder_id: None,
                items: Vec::new(),
            })
            .items
            .push(item.clone());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::extract_patient_id;

    fn slide(id: &str, name: &str) -> Item {
        Item::new(id, name)
    }

    #[test]
    fn groups_items_by_derived_patient_id() {
        let items = vec![
            slide("a", "550058_2_Sil_1.mrxs"),
            slide("b", "550058_3_HE_1.mrxs"),
            slide("c", "991234_1_Tau_1.mrxs"),
        ];

        let outcome = group_by_patient(&items, extract_patient_id);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.groups.len(), 2);

        let group = &outcome.groups["550058"];
        assert_eq!(group.patient_id, "550058");
        assert!(group.target_folder_id.is_none());
        assert_eq!(group.items.len(), 2);
        // First-seen order within the group.
        assert_eq!(group.items[0].id, "a");
        assert_eq!(group.items[1].id, "b");
    }

    #[test]
    fn underivable_items_are_skipped_with_diagnostics() {
        let items = vec![slide("a", "550058_2_Sil_1.mrxs"), slide("b", "mystery.svs")];

        let outcome = group_by_patient(&items, extract_patient_id);
        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].contains("mystery.svs"));
    }

    #[test]
    fn empty_input_yields_empty_outcome() {
        let outcome = group_by_patient(&[], extract_patient_id);
        assert!(outcome.groups.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn accepts_custom_extractors() {
        let items = vec![slide("a", "anything.svs"), slide("b", "else.svs")];
        let outcome = group_by_patient(&items, |item| Some(item.id.clone()));
        assert_eq!(outcome.groups.len(), 2);
    }
}
