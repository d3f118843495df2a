use std::cmp::Ordering;

/// Compare titles for display ordering.
///
/// Letters are first compared without regard to case; strings that differ only
/// in case place the lowercase form first, matching the tertiary strength of a
/// root-locale collator. Remaining ties fall back to code point order so the
/// result is a total order.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    folded(a)
        .cmp(folded(b))
        .then_with(|| a.chars().map(case_rank).cmp(b.chars().map(case_rank)))
        .then_with(|| a.cmp(b))
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

const fn case_rank(c: char) -> u8 {
    if c.is_uppercase() { 1 } else { 0 }
}
