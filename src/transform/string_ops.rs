use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

pub const LINE_BREAK_TAG: &str = "<br>";
pub const NO_COUPON: &str = "no coupon";

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Replaces every literal `<br>` with a single space.
pub fn replace_line_breaks(input: &str) -> Cow<'_, str> {
    if input.contains(LINE_BREAK_TAG) {
        Cow::Owned(input.replace(LINE_BREAK_TAG, " "))
    } else {
        Cow::Borrowed(input)
    }
}

/// Removes angle-bracket tags, borrowing the input when nothing matches.
pub fn remove_tags(input: &str) -> Cow<'_, str> {
    tag_pattern().replace_all(input, "")
}

/// Collapses whitespace runs to a single space and trims both ends.
pub fn collapse_whitespace(input: &str) -> Cow<'_, str> {
    let trimmed = input.trim();
    let mut previous_space = false;
    let already_collapsed = trimmed.chars().all(|ch| {
        let ok = !(ch.is_whitespace() && (ch != ' ' || previous_space));
        previous_space = ch == ' ';
        ok
    });
    if already_collapsed {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Line breaks become spaces, remaining tags are dropped, whitespace is
/// collapsed. Applying it to its own output is a no-op.
pub fn strip_html(input: &str) -> Cow<'_, str> {
    match replace_line_breaks(input) {
        Cow::Borrowed(text) => match remove_tags(text) {
            Cow::Borrowed(untagged) => collapse_whitespace(untagged),
            Cow::Owned(untagged) => Cow::Owned(collapse_whitespace(&untagged).into_owned()),
        },
        Cow::Owned(text) => Cow::Owned(collapse_whitespace(&remove_tags(&text)).into_owned()),
    }
}

/// Exact empty-string match only; whitespace-only values pass through.
pub fn normalize_coupon(input: &str) -> Cow<'_, str> {
    if input.is_empty() {
        Cow::Borrowed(NO_COUPON)
    } else {
        Cow::Borrowed(input)
    }
}
