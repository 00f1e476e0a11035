mod common;

use std::borrow::Cow;

use order_pipeline::clean::{clean_coupon_column, clean_items_html};
use order_pipeline::data::Value;
use order_pipeline::error::PipelineError;
use order_pipeline::table::Table;
use order_pipeline::transform::string_ops::{
    NO_COUPON, collapse_whitespace, normalize_coupon, remove_tags, replace_line_breaks,
    strip_html,
};
use proptest::prelude::*;
use serde_json::json;

use common::{column_text, order, raw_table};

#[test]
fn strip_html_turns_line_breaks_into_spaces() {
    assert_eq!(strip_html("<p>Item<br>Two</p>"), "Item Two");
    assert_eq!(strip_html("<ul><li>Lamp</li><li>Desk</li></ul>"), "LampDesk");
    assert_eq!(strip_html("Lamp<br><br>  Desk\n\t<b>Chair</b> "), "Lamp Desk Chair");
}

#[test]
fn strip_html_only_treats_exact_br_as_a_break() {
    assert_eq!(strip_html("A<br/>B"), "AB");
    assert_eq!(strip_html("A<BR>B"), "AB");
}

#[test]
fn strip_html_keeps_unmatched_brackets() {
    assert_eq!(strip_html("3 < 4"), "3 < 4");
    assert_eq!(strip_html("a <> b"), "a <> b");
    assert_eq!(strip_html("3 < 4 and 5 > 2"), "3 2");
    assert_eq!(strip_html("<<b>bold>"), "bold>");
}

#[test]
fn string_ops_borrow_when_unchanged() {
    assert!(matches!(replace_line_breaks("plain"), Cow::Borrowed("plain")));
    assert!(matches!(remove_tags("plain"), Cow::Borrowed("plain")));
    assert!(matches!(collapse_whitespace("a b c"), Cow::Borrowed("a b c")));
    assert!(matches!(collapse_whitespace("  a b "), Cow::Borrowed("a b")));
    assert!(matches!(collapse_whitespace("a\tb"), Cow::Owned(_)));
    assert!(matches!(strip_html("Item Two"), Cow::Borrowed("Item Two")));
}

#[test]
fn normalize_coupon_is_an_exact_empty_match() {
    assert_eq!(normalize_coupon(""), NO_COUPON);
    assert_eq!(normalize_coupon(" "), " ");
    assert_eq!(normalize_coupon("SAVE10"), "SAVE10");
}

#[test]
fn clean_items_html_rewrites_the_column_in_place() {
    let mut first = order(1, "$10", 4.0, 1, "US");
    first["items_html"] = json!("<div>Pen<br>Ink</div>\n");
    let second = order(2, "$10", 4.0, 1, "US");
    let raw = raw_table(vec![first, second]);

    let cleaned = clean_items_html(raw.clone()).expect("clean");

    assert_eq!(cleaned.headers(), raw.headers());
    assert_eq!(column_text(&cleaned, "items_html"), vec!["Pen Ink", "Widget"]);
}

#[test]
fn clean_items_html_skips_empty_cells() {
    let mut record = order(1, "$10", 4.0, 1, "US");
    record["items_html"] = json!(null);
    let cleaned = clean_items_html(raw_table(vec![record])).expect("clean");
    assert_eq!(cleaned.cell(0, "items_html").unwrap(), None);
}

#[test]
fn clean_items_html_requires_the_column() {
    let table = Table::new(vec!["country".into()]);
    assert_eq!(
        clean_items_html(table).unwrap_err(),
        PipelineError::MissingField {
            column: "items_html".into()
        }
    );
}

#[test]
fn clean_coupon_column_fills_only_empty_strings() {
    let coupons = ["", "SPRING", " ", ""];
    let orders = coupons
        .iter()
        .enumerate()
        .map(|(idx, coupon)| {
            let mut record = order(idx as i64, "$10", 4.0, 1, "US");
            record["coupon_used"] = json!(coupon);
            record
        })
        .collect();

    let cleaned = clean_coupon_column(raw_table(orders)).expect("clean");

    assert_eq!(
        column_text(&cleaned, "coupon_used"),
        vec!["no coupon", "SPRING", " ", "no coupon"]
    );
}

#[test]
fn clean_coupon_column_leaves_nulls_and_non_text() {
    let mut missing = order(1, "$10", 4.0, 1, "US");
    missing["coupon_used"] = json!(null);
    let mut numeric = order(2, "$10", 4.0, 1, "US");
    numeric["coupon_used"] = json!(0);

    let cleaned = clean_coupon_column(raw_table(vec![missing, numeric])).expect("clean");

    assert_eq!(cleaned.cell(0, "coupon_used").unwrap(), None);
    assert_eq!(cleaned.cell(1, "coupon_used").unwrap(), Some(&Value::Integer(0)));
}

proptest! {
    #[test]
    fn strip_html_is_idempotent(text in "[a-zA-Z <>/br\t\n]{0,40}") {
        let once = strip_html(&text).into_owned();
        let twice = strip_html(&once).into_owned();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn strip_html_output_has_no_tags_or_loose_whitespace(text in "[a-z <>/\n]{0,40}") {
        let cleaned = strip_html(&text).into_owned();
        prop_assert!(!cleaned.contains("<br>"));
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.contains('\n'));
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }

    #[test]
    fn clean_coupon_column_never_leaves_empty_values(
        coupons in proptest::collection::vec(prop_oneof![Just(String::new()), "[A-Z0-9 ]{1,6}"], 1..12)
    ) {
        let orders = coupons
            .iter()
            .enumerate()
            .map(|(idx, coupon)| {
                let mut record = order(idx as i64, "$10", 4.0, 1, "US");
                record["coupon_used"] = json!(coupon);
                record
            })
            .collect();
        let raw = raw_table(orders);
        let cleaned = clean_coupon_column(raw.clone()).expect("clean");
        let after = column_text(&cleaned, "coupon_used");
        for (before, after) in coupons.iter().zip(&after) {
            prop_assert!(!after.is_empty());
            if before.is_empty() {
                prop_assert_eq!(after.as_str(), NO_COUPON);
            } else {
                prop_assert_eq!(after, before);
            }
        }
        for column in raw.headers().iter().filter(|name| *name != "coupon_used") {
            prop_assert_eq!(
                raw.column_values(column).unwrap(),
                cleaned.column_values(column).unwrap()
            );
        }
    }
}
