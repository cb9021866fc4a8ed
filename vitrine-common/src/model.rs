//! Canonical catalog records
//!
//! Items and evaluations are built once per load cycle by the normalizer and
//! are read-only afterwards. Serialized field names are camelCase; raw
//! documents on disk use the original key names (see `normalize`).

use serde::{Deserialize, Serialize};

/// A normalized coffee sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Identifier (generated when the document has none)
    pub id: String,
    /// Creation/sort key in Unix epoch milliseconds
    #[serde(rename = "_ts")]
    pub ts: i64,
    pub name: String,
    pub producer: String,
    pub origin: String,
    pub variety: String,
    pub process: String,
    /// Roast date exactly as written in the document (not parsed)
    pub roast_date: String,
    /// Tasting date exactly as written in the document (not parsed)
    pub tasting_date: String,
    pub roaster: String,
    /// Bean density in g/L
    pub density: Option<f64>,
    /// Screen size in μm
    pub size: Option<i64>,
    /// Moisture in percent
    pub humidity: Option<f64>,
    /// Agtron roast color number
    pub agtron: Option<i64>,
    pub roast_level: String,
    pub defects: String,
    /// Sensory profile notes
    pub profile: String,
    pub impressions: String,
    pub tags: Vec<String>,
    pub evaluations: Vec<Evaluation>,
}

/// A single brew/extraction trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: String,
    /// Brew method (e.g. "V60", "Espresso")
    pub method: String,
    /// 0 = unrated, 1..=5 otherwise
    pub rating: u8,
    /// Grind size in μm
    pub grind_size: Option<i64>,
    /// Dose in grams
    pub dose: Option<f64>,
    /// Beverage yield in grams
    #[serde(rename = "yield")]
    pub beverage_yield: Option<f64>,
    /// Extraction time in seconds
    pub time: Option<i64>,
    /// Water temperature in °C
    pub water_temp: Option<f64>,
    pub best_use: String,
    pub comments: String,
}

impl Item {
    /// An item with every field empty, carrying the given identity
    pub fn empty(id: String, ts: i64) -> Self {
        Self {
            id,
            ts,
            name: String::new(),
            producer: String::new(),
            origin: String::new(),
            variety: String::new(),
            process: String::new(),
            roast_date: String::new(),
            tasting_date: String::new(),
            roaster: String::new(),
            density: None,
            size: None,
            humidity: None,
            agtron: None,
            roast_level: String::new(),
            defects: String::new(),
            profile: String::new(),
            impressions: String::new(),
            tags: Vec::new(),
            evaluations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_serializes_with_canonical_keys() {
        let mut item = Item::empty("abc".to_string(), 42);
        item.roast_level = "medium".to_string();
        item.evaluations.push(Evaluation {
            id: "e1".to_string(),
            method: "V60".to_string(),
            rating: 4,
            grind_size: Some(600),
            dose: Some(15.0),
            beverage_yield: Some(250.0),
            time: Some(180),
            water_temp: Some(93.5),
            best_use: String::new(),
            comments: String::new(),
        });

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["_ts"], json!(42));
        assert_eq!(value["roastLevel"], json!("medium"));
        assert_eq!(value["density"], json!(null));
        assert_eq!(value["evaluations"][0]["yield"], json!(250.0));
        assert_eq!(value["evaluations"][0]["grindSize"], json!(600));
        assert_eq!(value["evaluations"][0]["waterTemp"], json!(93.5));
    }
}
