//! Property tests for the numeric normalizer.

use canje_transform::normalization::numeric::to_num_opt;
use canje_transform::{parse_count, to_num};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalizer_is_pure(input in ".{0,24}") {
        prop_assert_eq!(to_num(&input), to_num(&input));
    }

    #[test]
    fn canonical_text_round_trips(value in -1.0e9f64..1.0e9f64) {
        let text = format!("{value}");
        prop_assert_eq!(to_num(&text), Some(value));
    }

    #[test]
    fn decimal_comma_matches_decimal_point(units in 0u32..100_000, cents in 0u32..100) {
        let period = format!("{units}.{cents:02}");
        let comma = format!("{units},{cents:02}");
        prop_assert_eq!(to_num(&period), to_num(&comma));
    }

    #[test]
    fn result_is_finite_or_missing(input in "[0-9.,\\- a-z]{0,16}") {
        if let Some(value) = to_num(&input) {
            prop_assert!(value.is_finite());
        }
    }

    #[test]
    fn integral_counts_parse(count in -1000i64..1000) {
        prop_assert_eq!(parse_count(&count.to_string()), Some(count));
        prop_assert_eq!(parse_count(&format!("{count}.0")), Some(count));
    }
}

#[test]
fn missing_cell_is_missing() {
    assert_eq!(to_num_opt(None), None);
    assert_eq!(to_num_opt(Some("1.234,56")), Some(1234.56));
}
