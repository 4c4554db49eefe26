//! FormDefinition step and field lookup over generated shapes.

use proptest::prelude::*;

use formsync_core::models::{Field, FieldKind, FormDefinition, FormId, Step};

/// Field counts per step; an empty vector yields a flat form with `flat` fields.
fn form(step_sizes: &[usize], flat: usize) -> FormDefinition {
    FormDefinition {
        id: FormId(1),
        title: "generated".into(),
        description: None,
        steps: step_sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| Step {
                title: None,
                fields: (0..n)
                    .map(|j| Field::new(format!("s{i}_f{j}"), "label", FieldKind::Text))
                    .collect(),
            })
            .collect(),
        fields: (0..flat)
            .map(|j| Field::new(format!("flat_{j}"), "label", FieldKind::Text))
            .collect(),
    }
}

proptest! {
    #[test]
    fn steps_exist_exactly_below_step_count(
        sizes in prop::collection::vec(0usize..5, 0..6),
        flat in 0usize..5,
        queried_step in 0usize..10,
    ) {
        let form = form(&sizes, flat);
        prop_assert_eq!(form.step_count(), sizes.len().max(1));
        prop_assert_eq!(form.last_step(), form.step_count() - 1);
        prop_assert_eq!(form.step_fields(queried_step).is_some(), queried_step < form.step_count());
    }

    #[test]
    fn every_field_is_found_on_its_own_step(
        sizes in prop::collection::vec(0usize..5, 1..6),
    ) {
        let form = form(&sizes, 2);
        for (i, &n) in sizes.iter().enumerate() {
            for j in 0..n {
                let name = format!("s{i}_f{j}");
                let (step, field) = form.find_field(&name).expect("generated field");
                prop_assert_eq!(step, i);
                prop_assert_eq!(&field.name, &name);
            }
        }
        // Flat fields are ignored once steps exist.
        prop_assert!(form.find_field("flat_0").is_none());
    }

    #[test]
    fn flat_form_fields_live_on_step_zero(flat in 0usize..8) {
        let form = form(&[], flat);
        prop_assert_eq!(form.step_fields(0).map(<[Field]>::len), Some(flat));
        for j in 0..flat {
            let found = form.find_field(&format!("flat_{j}")).map(|(step, _)| step);
            prop_assert_eq!(found, Some(0));
        }
    }
}
