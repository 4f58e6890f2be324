//! Tolerant extraction of rating lists from analysis text.
//!
//! The analysis service is asked to answer `[food...], [service...]` but
//! replies are free text. The first `[...], [...]` pair wins; inside each
//! group only tokens made of ASCII digits are kept, everything else is
//! dropped silently.

use crate::scoring::RatingPair;
use regex::Regex;
use std::sync::OnceLock;

fn group_pair() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[([^\[\]]*)\]\s*,\s*\[([^\[\]]*)\]").expect("rating pattern is valid")
    })
}

fn digits(group: &str) -> Vec<i64> {
    group
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// Extract `(food, service)` ratings from `text`.
///
/// Never fails: no match gives two empty lists. The lists may differ in
/// length; see [`RatingPair::aligned`].
///
/// ```rust
/// use avaliador::analysis::parse_scores;
///
/// let pair = parse_scores("Comida mediana e atendimento incrível. [3], [5]");
/// assert_eq!((pair.food, pair.service), (vec![3], vec![5]));
/// ```
pub fn parse_scores(text: &str) -> RatingPair {
    match group_pair().captures(text) {
        Some(caps) => RatingPair::new(digits(&caps[1]), digits(&caps[2])),
        None => RatingPair::default(),
    }
}
