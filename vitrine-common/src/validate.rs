//! Non-blocking validation of catalog documents
//!
//! Validation never rejects anything: it returns human-readable warnings,
//! in discovery order, one per violated rule. Items are rendered regardless.

use serde_json::Value;

use crate::model::Item;
use crate::normalize::{field, keys};

/// Minimum name length in characters
pub const MIN_NAME_CHARS: usize = 2;

pub const MSG_INVALID_OBJECT: &str = "invalid object";
pub const MSG_NAME_REQUIRED: &str = "name is required (>=2 chars)";
pub const MSG_EVALUATIONS_NOT_LIST: &str = "evaluations must be a list";

fn method_required(index: usize) -> String {
    format!("evaluation #{}: method is required", index)
}

fn rating_out_of_range(index: usize) -> String {
    format!("evaluation #{}: rating must be 1..5", index)
}

/// Validate a normalized item
///
/// Evaluations are numbered from 1 in messages. A rating of 0 (unrated)
/// is reported as out of range.
pub fn validate_item(item: &Item) -> Vec<String> {
    let mut warnings = Vec::new();

    if item.name.chars().count() < MIN_NAME_CHARS {
        warnings.push(MSG_NAME_REQUIRED.to_string());
    }

    for (i, evaluation) in item.evaluations.iter().enumerate() {
        if evaluation.method.is_empty() {
            warnings.push(method_required(i + 1));
        }
        if !(1..=5).contains(&evaluation.rating) {
            warnings.push(rating_out_of_range(i + 1));
        }
    }

    warnings
}

/// Validate a raw document before normalization
///
/// Used by the manifest generator, which sees documents exactly as written.
/// Stricter about kinds than [`validate_item`]: names and methods must be
/// strings, ratings must be numbers.
pub fn validate_raw(doc: &Value) -> Vec<String> {
    if !doc.is_object() {
        return vec![MSG_INVALID_OBJECT.to_string()];
    }

    let mut warnings = Vec::new();

    let name_ok = field(doc, keys::NAME)
        .and_then(Value::as_str)
        .map_or(false, |name| name.trim().chars().count() >= MIN_NAME_CHARS);
    if !name_ok {
        warnings.push(MSG_NAME_REQUIRED.to_string());
    }

    match field(doc, keys::EVALUATIONS) {
        None => {}
        Some(Value::Array(evaluations)) => {
            for (i, evaluation) in evaluations.iter().enumerate() {
                let method_ok = field(evaluation, keys::METHOD)
                    .and_then(Value::as_str)
                    .map_or(false, |method| !method.trim().is_empty());
                if !method_ok {
                    warnings.push(method_required(i + 1));
                }

                let rating_ok = field(evaluation, keys::RATING)
                    .and_then(Value::as_f64)
                    .map_or(false, |rating| (1.0..=5.0).contains(&rating.trunc()));
                if !rating_ok {
                    warnings.push(rating_out_of_range(i + 1));
                }
            }
        }
        Some(_) => warnings.push(MSG_EVALUATIONS_NOT_LIST.to_string()),
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_item;
    use serde_json::json;

    #[test]
    fn test_valid_item_has_no_warnings() {
        let raw = json!({"nome": "Café Bom", "avaliacoes": [{"metodo": "V60", "nota": 5}]});
        assert!(validate_item(&normalize_item(&raw)).is_empty());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let raw = json!({"nome": "A", "avaliacoes": [{"metodo": "", "nota": 0}]});
        let warnings = validate_item(&normalize_item(&raw));
        assert_eq!(
            warnings,
            vec![
                "name is required (>=2 chars)".to_string(),
                "evaluation #1: method is required".to_string(),
                "evaluation #1: rating must be 1..5".to_string(),
            ]
        );
    }

    #[test]
    fn test_violations_across_evaluations_are_numbered() {
        let raw = json!({
            "nome": "Bourbon",
            "avaliacoes": [
                {"metodo": "V60", "nota": 4},
                {"nota": 3},
                {"metodo": "Moka"},
            ]
        });
        let warnings = validate_item(&normalize_item(&raw));
        assert_eq!(
            warnings,
            vec![
                "evaluation #2: method is required".to_string(),
                "evaluation #3: rating must be 1..5".to_string(),
            ]
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        let raw = json!({"nome": "Çá"});
        assert!(validate_item(&normalize_item(&raw)).is_empty());
    }

    #[test]
    fn test_validate_item_does_not_mutate() {
        let item = normalize_item(&json!({"nome": "", "avaliacoes": [{}]}));
        let before = item.clone();
        let _ = validate_item(&item);
        assert_eq!(item, before);
    }

    #[test]
    fn test_raw_non_object() {
        assert_eq!(validate_raw(&json!([1, 2])), vec!["invalid object".to_string()]);
        assert_eq!(validate_raw(&json!(null)), vec!["invalid object".to_string()]);
    }

    #[test]
    fn test_raw_evaluations_must_be_list() {
        let warnings = validate_raw(&json!({"nome": "Geisha", "avaliacoes": "V60"}));
        assert_eq!(warnings, vec!["evaluations must be a list".to_string()]);

        assert!(validate_raw(&json!({"nome": "Geisha", "avaliacoes": null})).is_empty());
        assert!(validate_raw(&json!({"nome": "Geisha"})).is_empty());
    }

    #[test]
    fn test_raw_checks_kinds() {
        let warnings = validate_raw(&json!({
            "nome": 42,
            "avaliacoes": [{"metodo": "  ", "nota": "5"}, {"metodo": "V60", "nota": 5.9}]
        }));
        assert_eq!(
            warnings,
            vec![
                "name is required (>=2 chars)".to_string(),
                "evaluation #1: method is required".to_string(),
                "evaluation #1: rating must be 1..5".to_string(),
            ]
        );
    }
}
