use proptest::prelude::*;
use topolink_engine::edges::edge_key;
use topolink_engine::ports::port_number;
use topolink_engine::resolve::{slugify, SyntheticIds};

fn node_id() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9-]{1,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn edge_key_is_direction_insensitive(a in node_id(), b in node_id()) {
        prop_assert_eq!(edge_key(&a, &b), edge_key(&b, &a));
    }

    #[test]
    fn port_number_is_total(s in ".*") {
        // Never panics; agrees with "has an extractable digit run".
        let extracted = port_number(&s);
        let has_digits = s.chars().any(|c| c.is_ascii_digit());
        if extracted.is_some() {
            prop_assert!(has_digits);
        }
    }

    #[test]
    fn slugs_are_lowercase_hyphen_alphanumeric(s in ".*") {
        let slug = slugify(&s);
        prop_assert!(slug.chars().all(|c| c == '-' || (c.is_alphanumeric() && !c.is_uppercase())));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
    }

    #[test]
    fn synthetic_ids_are_prefixed_and_unique(keys in proptest::collection::vec("[a-zA-Z0-9 .:_-]{0,20}", 1..20)) {
        let mut ids = SyntheticIds::default();
        let mut taken: Vec<String> = Vec::new();
        for key in &keys {
            if ids.get(key).is_some() {
                continue;
            }
            let existing = taken.clone();
            let id = ids.allocate(key, |c| existing.iter().any(|t| t == c));
            prop_assert!(id.starts_with("ext-"));
            prop_assert!(!taken.contains(&id), "allocated id collided: {id}");
            taken.push(id);
        }
    }
}
