//! Rating aggregation

use crate::model::Evaluation;

/// Mean rating of a set of evaluations, rounded half-up
///
/// Unrated evaluations (rating 0) count as 0. An empty set yields 0.
pub fn aggregate_rating(evaluations: &[Evaluation]) -> u8 {
    if evaluations.is_empty() {
        return 0;
    }

    let sum: u32 = evaluations.iter().map(|e| u32::from(e.rating)).sum();
    let mean = f64::from(sum) / evaluations.len() as f64;
    (mean + 0.5).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_evaluation;
    use serde_json::json;

    fn rated(ratings: &[u64]) -> Vec<Evaluation> {
        ratings
            .iter()
            .map(|r| normalize_evaluation(&json!({"metodo": "V60", "nota": r})))
            .collect()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(aggregate_rating(&[]), 0);
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(aggregate_rating(&rated(&[1, 2])), 2);
        assert_eq!(aggregate_rating(&rated(&[3, 4])), 4);
        assert_eq!(aggregate_rating(&rated(&[2, 3])), 3);
    }

    #[test]
    fn test_rounds_down_below_half() {
        assert_eq!(aggregate_rating(&rated(&[1, 1, 2])), 1);
        assert_eq!(aggregate_rating(&rated(&[5, 4, 4])), 4);
    }

    #[test]
    fn test_unrated_counts_as_zero() {
        assert_eq!(aggregate_rating(&rated(&[0, 5])), 3);
        assert_eq!(aggregate_rating(&rated(&[0, 0, 0])), 0);
    }

    #[test]
    fn test_single_evaluation() {
        assert_eq!(aggregate_rating(&rated(&[5])), 5);
    }
}
