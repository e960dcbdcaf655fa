//! Layout Engine
//!
//! Partitions a service's fields into steps. Pure function of the field
//! list, the layout map and the multi-step flag.

use std::collections::BTreeMap;

use crate::domain::value_objects::{FieldDefinition, LayoutAssignment};

/// What a step carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// Data fields only; has a `Next` control
    Data,
    /// Trailing step: consents and submit, no data fields
    Final,
    /// Single-step form: fields, consents and submit together
    Combined,
}

/// A field placed on a step with its resolved widths
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedField<'a> {
    pub field: &'a FieldDefinition,
    /// Index in the service's field list
    pub position: usize,
    pub assignment: LayoutAssignment,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step<'a> {
    /// 1-based display position
    pub index: u32,
    pub kind: StepKind,
    pub fields: Vec<PlacedField<'a>>,
}

impl Step<'_> {
    /// Whether consents and the submit control live on this step
    pub fn carries_submit(&self) -> bool {
        matches!(self.kind, StepKind::Final | StepKind::Combined)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormLayout<'a> {
    steps: Vec<Step<'a>>,
}

impl<'a> FormLayout<'a> {
    pub fn plan(
        fields: &'a [FieldDefinition],
        layout: &BTreeMap<String, LayoutAssignment>,
        multi_step: bool,
    ) -> Self {
        let placed: Vec<PlacedField<'a>> = fields
            .iter()
            .enumerate()
            .map(|(position, field)| PlacedField {
                field,
                position,
                assignment: layout.get(&field.name).copied().unwrap_or_default(),
            })
            .collect();

        if !multi_step || placed.is_empty() {
            return Self {
                steps: vec![Step {
                    index: 1,
                    kind: StepKind::Combined,
                    fields: placed,
                }],
            };
        }

        // Field order inside a group follows the service's field order.
        let mut groups: BTreeMap<u32, Vec<PlacedField<'a>>> = BTreeMap::new();
        for p in placed {
            groups.entry(p.assignment.effective_step()).or_default().push(p);
        }

        let mut steps: Vec<Step<'a>> = groups
            .into_values()
            .filter(|g| !g.is_empty())
            .enumerate()
            .map(|(i, fields)| Step {
                index: i as u32 + 1,
                kind: StepKind::Data,
                fields,
            })
            .collect();

        steps.push(Step {
            index: steps.len() as u32 + 1,
            kind: StepKind::Final,
            fields: Vec::new(),
        });

        tracing::debug!(total_steps = steps.len(), "planned multi-step layout");
        Self { steps }
    }

    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    pub fn total_steps(&self) -> u32 {
        self.steps.len() as u32
    }

    /// More than one step, so navigation and the step indicator apply
    pub fn is_multi_step(&self) -> bool {
        self.steps.len() > 1
    }

    pub fn step(&self, index: u32) -> Option<&Step<'a>> {
        self.steps.iter().find(|s| s.index == index)
    }

    pub fn last_step(&self) -> &Step<'a> {
        // plan() always produces at least one step
        &self.steps[self.steps.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FieldType;
    use proptest::prelude::*;

    fn fields(names: &[&str]) -> Vec<FieldDefinition> {
        names
            .iter()
            .map(|n| FieldDefinition::new(*n, n.to_uppercase(), FieldType::Text))
            .collect()
    }

    fn names<'a>(step: &Step<'a>) -> Vec<&'a str> {
        step.fields.iter().map(|p| p.field.name.as_str()).collect()
    }

    #[test]
    fn test_single_step_keeps_order() {
        let f = fields(&["nome", "telefono", "email"]);
        let mut map = BTreeMap::new();
        map.insert("email".to_string(), LayoutAssignment::on_step(3));

        let layout = FormLayout::plan(&f, &map, false);
        assert_eq!(layout.total_steps(), 1);
        assert!(!layout.is_multi_step());
        assert_eq!(layout.steps()[0].kind, StepKind::Combined);
        assert_eq!(names(&layout.steps()[0]), vec!["nome", "telefono", "email"]);
    }

    #[test]
    fn test_multi_step_compacts_gaps() {
        let f = fields(&["a", "b", "c", "d", "e"]);
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), LayoutAssignment::on_step(5));
        map.insert("b".to_string(), LayoutAssignment::on_step(2));
        map.insert("c".to_string(), LayoutAssignment::on_step(9));
        map.insert("d".to_string(), LayoutAssignment::on_step(2));
        // e has no assignment -> step 1

        let layout = FormLayout::plan(&f, &map, true);
        let idx: Vec<u32> = layout.steps().iter().map(|s| s.index).collect();
        assert_eq!(idx, vec![1, 2, 3, 4, 5]);
        assert_eq!(names(&layout.steps()[0]), vec!["e"]);
        assert_eq!(names(&layout.steps()[1]), vec!["b", "d"]);
        assert_eq!(names(&layout.steps()[2]), vec!["a"]);
        assert_eq!(names(&layout.steps()[3]), vec!["c"]);
        assert_eq!(layout.last_step().kind, StepKind::Final);
        assert!(layout.last_step().fields.is_empty());
    }

    #[test]
    fn test_zero_fields_is_single_combined_step() {
        let layout = FormLayout::plan(&[], &BTreeMap::new(), true);
        assert_eq!(layout.total_steps(), 1);
        assert_eq!(layout.steps()[0].kind, StepKind::Combined);
    }

    #[test]
    fn test_all_fields_one_step_still_gets_trailing_step() {
        let f = fields(&["a", "b"]);
        let layout = FormLayout::plan(&f, &BTreeMap::new(), true);
        assert_eq!(layout.total_steps(), 2);
        assert_eq!(layout.steps()[0].kind, StepKind::Data);
        assert!(layout.step(2).unwrap().carries_submit());
    }

    #[test]
    fn test_stale_assignments_ignored() {
        let f = fields(&["a"]);
        let mut map = BTreeMap::new();
        map.insert("gone".to_string(), LayoutAssignment::on_step(4));
        let layout = FormLayout::plan(&f, &map, true);
        assert_eq!(layout.total_steps(), 2);
    }

    proptest! {
        #[test]
        fn prop_steps_are_contiguous_and_non_empty(
            assigned in proptest::collection::vec(proptest::option::of(0u32..20), 0..12)
        ) {
            let f: Vec<FieldDefinition> = (0..assigned.len())
                .map(|i| FieldDefinition::new(format!("f{i}"), format!("F{i}"), FieldType::Text))
                .collect();
            let mut map = BTreeMap::new();
            for (i, step) in assigned.iter().enumerate() {
                if let Some(s) = step {
                    map.insert(format!("f{i}"), LayoutAssignment::on_step(*s));
                }
            }

            let layout = FormLayout::plan(&f, &map, true);
            let steps = layout.steps();
            for (i, step) in steps.iter().enumerate() {
                prop_assert_eq!(step.index, i as u32 + 1);
            }
            let (last, data) = steps.split_last().unwrap();
            prop_assert!(last.carries_submit());
            for step in data {
                prop_assert!(!step.fields.is_empty());
            }
            let placed: usize = steps.iter().map(|s| s.fields.len()).sum();
            prop_assert_eq!(placed, f.len());
        }
    }
}
