//! Composite restaurant score.
//!
//! Each (food, service) pair contributes `sqrt(food² · service)`, so food
//! weighs quadratically and service linearly. The sum is normalized by the
//! best possible term, `sqrt(5² · 5) = sqrt(125)`, and scaled to [0, 10].

use crate::call::Value;
use std::fmt;
use tracing::warn;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Food and service ratings, one entry per review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingPair {
    pub food: Vec<i64>,
    pub service: Vec<i64>,
}

impl RatingPair {
    pub fn new(food: Vec<i64>, service: Vec<i64>) -> Self {
        Self { food, service }
    }

    /// Both sequences have at least one rating.
    pub fn is_complete(&self) -> bool {
        !self.food.is_empty() && !self.service.is_empty()
    }

    /// Truncate both sequences to their common prefix length.
    pub fn aligned(mut self) -> Self {
        let n = self.food.len().min(self.service.len());
        if self.food.len() != self.service.len() {
            warn!(
                food = self.food.len(),
                service = self.service.len(),
                kept = n,
                "Rating lists differ in length, truncating"
            );
        }
        self.food.truncate(n);
        self.service.truncate(n);
        self
    }
}

/// Final score of one restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub restaurant_name: String,
    pub score: f64,
}

impl ScoreResult {
    pub fn to_value(&self) -> Value {
        Value::Map(vec![(self.restaurant_name.clone(), Value::Float(self.score))])
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

fn clamp_rating(rating: i64) -> i64 {
    let clamped = rating.clamp(MIN_RATING, MAX_RATING);
    if clamped != rating {
        warn!(rating, clamped, "Rating outside [1, 5], clamping");
    }
    clamped
}

/// Round half away from zero to three decimals.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fixed three-decimal rendering used in user-facing output.
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

/// Composite score in [0, 10], rounded to three decimals.
///
/// Uses the first `min(len(food), len(service))` pairs. Either sequence
/// empty gives `0.0`. Ratings outside [1, 5] are clamped.
///
/// ```rust
/// use avaliador::scoring::score;
///
/// assert_eq!(score(&[5, 5, 5], &[5, 5, 5]), 10.0);
/// assert_eq!(score(&[], &[3]), 0.0);
/// ```
pub fn score(food: &[i64], service: &[i64]) -> f64 {
    let n = food.len().min(service.len());
    if n == 0 {
        return 0.0;
    }

    let total: f64 = food
        .iter()
        .zip(service)
        .map(|(&f, &s)| {
            let f = clamp_rating(f) as f64;
            let s = clamp_rating(s) as f64;
            (f * f * s).sqrt()
        })
        .sum();

    round3(total * 10.0 / (n as f64 * 125f64.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_maximum() {
        assert_eq!(score(&[5, 5, 5], &[5, 5, 5]), 10.0);
        assert_eq!(format_score(score(&[5, 5, 5], &[5, 5, 5])), "10.000");
    }

    #[test]
    fn test_reference_scenario() {
        // Σ sqrt(i³) for i in 1..=5 is 28.2085..., giving 5.04545...
        assert_eq!(score(&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]), 5.045);
    }

    #[test]
    fn test_single_pair() {
        assert_eq!(score(&[2], &[3]), 3.098);
        assert_eq!(score(&[1], &[1]), 0.894);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(score(&[], &[1, 2, 3]), 0.0);
        assert_eq!(score(&[4, 5], &[]), 0.0);
        assert_eq!(score(&[], &[]), 0.0);
    }

    #[test]
    fn test_unequal_lengths_use_common_prefix() {
        assert_eq!(score(&[2, 5, 5], &[3]), score(&[2], &[3]));
        assert_eq!(score(&[4], &[3, 1, 1]), score(&[4], &[3]));
    }

    #[test]
    fn test_out_of_range_ratings_are_clamped() {
        assert_eq!(score(&[9], &[9]), 10.0);
        assert_eq!(score(&[0], &[-2]), score(&[1], &[1]));
    }

    #[test]
    fn test_aligned() {
        let pair = RatingPair::new(vec![1, 2, 3], vec![4]).aligned();
        assert_eq!(pair, RatingPair::new(vec![1], vec![4]));
        assert!(pair.is_complete());
        assert!(!RatingPair::new(vec![], vec![4]).is_complete());
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(5.0454545), 5.045);
        assert_eq!(round3(3.0984), 3.098);
        assert_eq!(round3(2.0), 2.0);
    }

    #[test]
    fn test_score_result_rendering() {
        let result = ScoreResult {
            restaurant_name: "Estação Barão".to_string(),
            score: 3.098,
        };
        assert_eq!(result.to_string(), "{'Estação Barão': 3.098}");
    }

    proptest! {
        #[test]
        fn prop_score_bounded(
            pairs in prop::collection::vec((1i64..=5, 1i64..=5), 1..50)
        ) {
            let (food, service): (Vec<i64>, Vec<i64>) = pairs.into_iter().unzip();
            let s = score(&food, &service);
            prop_assert!((0.0..=10.0).contains(&s));
        }

        #[test]
        fn prop_format_round_trips(
            pairs in prop::collection::vec((1i64..=5, 1i64..=5), 1..20)
        ) {
            let (food, service): (Vec<i64>, Vec<i64>) = pairs.into_iter().unzip();
            let s = score(&food, &service);
            let parsed: f64 = format_score(s).parse().unwrap();
            prop_assert_eq!(round3(parsed), s);
        }

        #[test]
        fn prop_score_is_deterministic(
            food in prop::collection::vec(-10i64..20, 0..10),
            service in prop::collection::vec(-10i64..20, 0..10),
        ) {
            let first = score(&food, &service);
            prop_assert_eq!(first.to_bits(), score(&food, &service).to_bits());
            prop_assert!((0.0..=10.0).contains(&first));
        }
    }
}
