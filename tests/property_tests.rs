#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use proptest::prelude::*;
use teigraph::vocab::xsd;
use teigraph::{
    classify, date_to_literal, extract_interval, matches_condition, normalize_string, DateKind,
    Document,
};

fn attribute_value() -> impl Strategy<Value = String> {
    "[a-z_]{0,12}"
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC*") {
        let once = normalize_string(&s);
        prop_assert_eq!(normalize_string(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn classify_never_panics(s in "\\PC*") {
        let kind = classify(Some(&s));
        if s.trim().is_empty() {
            prop_assert_eq!(kind, DateKind::Undefined);
        } else {
            prop_assert_eq!(kind.lexical(), s.trim());
        }
    }

    #[test]
    fn valid_dates_are_xsd_dates(year in 1000i32..=9999, month in 1u8..=12, day in 1u8..=28) {
        let date = date_to_literal(Some(&format!("{year:04}-{month:02}-{day:02}")));
        prop_assert_eq!(date.datatype(), xsd::DATE);
        let year_month = date_to_literal(Some(&format!("{year:04}-{month:02}")));
        prop_assert_eq!(year_month.datatype(), xsd::G_YEAR_MONTH);
        let year = date_to_literal(Some(&format!("{year:04}")));
        prop_assert_eq!(year.datatype(), xsd::G_YEAR);
    }

    #[test]
    fn signed_years_are_plain_strings(sign in "[+-]", year in 1000i32..=9999, month in 1u8..=12) {
        for value in [format!("{sign}{year}"), format!("{sign}{year}-{month:02}-01")] {
            let literal = date_to_literal(Some(&value));
            prop_assert_eq!(literal.datatype(), xsd::STRING);
            prop_assert_eq!(classify(Some(&value)), DateKind::PlainString(value.clone()));
        }
    }

    #[test]
    fn condition_is_equal_or_absent(present in any::<bool>(), found in attribute_value(), wanted in attribute_value()) {
        let xml = if present {
            format!(r#"<placeName type="{found}"/>"#)
        } else {
            "<placeName/>".to_string()
        };
        let doc = Document::parse(&xml).unwrap();
        prop_assert_eq!(matches_condition(&doc.root, "type", &wanted), !present || found == wanted);
    }

    #[test]
    fn when_fills_both_sides(when in "[0-9]{4}") {
        let doc = Document::parse(&format!(r#"<date when="{when}"/>"#)).unwrap();
        let interval = extract_interval(&doc.root);
        prop_assert_eq!(interval.begin.as_deref(), Some(when.as_str()));
        prop_assert_eq!(interval.end.as_deref(), Some(when.as_str()));
    }
}
