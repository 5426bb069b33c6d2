// Property tests for the phone sanitizer, validation and search

use proptest::prelude::*;
use registro::form::{sanitize_tel, validate_field, FormState, ValidationError};
use registro::records::{search, Record};
use registro::schema::{default_config, Field, FieldType};

fn tel_field() -> Field {
    Field::new("telefono", "Teléfono", FieldType::Tel, false, None)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn sanitized_tel_is_at_most_eight_digits(raw in ".{0,40}") {
        let clean = sanitize_tel(&raw);
        prop_assert!(clean.len() <= 8);
        prop_assert!(clean.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn every_keystroke_keeps_tel_clean(keys in proptest::collection::vec(any::<char>(), 0..30)) {
        let mut config = default_config();
        config.fields.push(tel_field());
        let field = tel_field();
        let mut state = FormState::new(&config);
        for c in keys {
            state.push_char(&field, c);
            let value = state.value("telefono");
            prop_assert!(value.len() <= 8);
            prop_assert!(value.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn wrong_digit_count_is_rejected(digits in "[0-9]{1,7}") {
        let err = validate_field(&tel_field(), &digits);
        prop_assert_eq!(err, Some(ValidationError::InvalidPhone { label: "Teléfono".to_string() }));
    }

    #[test]
    fn eight_digits_accepted(digits in "[0-9]{8}") {
        prop_assert_eq!(validate_field(&tel_field(), &digits), None);
    }

    #[test]
    fn search_returns_ordered_subset(
        names in proptest::collection::vec("[a-zA-Z]{1,8}", 0..12),
        term in "[a-z]{0,3}",
    ) {
        let records: Vec<Record> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Record::new(i as i64, "", vec![("nombres".to_string(), name.clone())]))
            .collect();
        let found = search(&records, &term);
        prop_assert!(found.len() <= records.len());
        prop_assert!(found.windows(2).all(|w| w[0].id < w[1].id));
        for record in &found {
            let name = record.get("nombres").unwrap().to_lowercase();
            prop_assert!(name.contains(&term));
        }
        let expected = names.iter().filter(|n| n.to_lowercase().contains(&term)).count();
        prop_assert_eq!(found.len(), expected);
    }
}
