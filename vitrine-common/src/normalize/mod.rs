//! Tolerant decoding of raw item documents into canonical records
//!
//! Every function here is total: any JSON value (null, scalar, array or
//! object) decodes into a well-formed [`Item`]. Instead of silently coercing,
//! the decoder matches on each value's JSON kind and records every coercion
//! it applied so the loader can report them.
//!
//! Raw documents use the original key names (`nome`, `avaliacoes`, ...).
//! Each field also accepts its canonical camelCase name, so a serialized
//! [`Item`] decodes back to itself.

pub mod lenient;

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::model::{Evaluation, Item};
use crate::{time, uid};

/// Raw key aliases, original name first
pub mod keys {
    pub const ID: &[&str] = &["id"];
    pub const TS: &[&str] = &["_ts"];
    pub const NAME: &[&str] = &["nome", "name"];
    pub const PRODUCER: &[&str] = &["produtor", "producer"];
    pub const ORIGIN: &[&str] = &["origem", "origin"];
    pub const VARIETY: &[&str] = &["variedade", "variety"];
    pub const PROCESS: &[&str] = &["processo", "process"];
    pub const ROAST_DATE: &[&str] = &["dataTorra", "roastDate"];
    pub const TASTING_DATE: &[&str] = &["dataBebido", "tastingDate"];
    pub const ROASTER: &[&str] = &["torrefador", "roaster"];
    pub const DENSITY: &[&str] = &["densidade", "density"];
    pub const SIZE: &[&str] = &["tamanho", "size"];
    pub const HUMIDITY: &[&str] = &["umidade", "humidity"];
    pub const AGTRON: &[&str] = &["agtron"];
    pub const ROAST_LEVEL: &[&str] = &["torraNivel", "roastLevel"];
    pub const DEFECTS: &[&str] = &["defeitos", "defects"];
    pub const PROFILE: &[&str] = &["perfil", "profile"];
    pub const IMPRESSIONS: &[&str] = &["impressoes", "impressions"];
    pub const TAGS: &[&str] = &["tags"];
    pub const EVALUATIONS: &[&str] = &["avaliacoes", "evaluations"];

    pub const METHOD: &[&str] = &["metodo", "method"];
    pub const RATING: &[&str] = &["nota", "rating"];
    pub const GRIND_SIZE: &[&str] = &["moagem", "grindSize"];
    pub const DOSE: &[&str] = &["dose"];
    pub const YIELD: &[&str] = &["rendimento", "yield"];
    pub const TIME: &[&str] = &["tempo", "time"];
    pub const WATER_TEMP: &[&str] = &["tempAgua", "waterTemp"];
    pub const BEST_USE: &[&str] = &["melhorUso", "bestUse"];
    pub const COMMENTS: &[&str] = &["comentarios", "comments"];
}

/// Kind of coercion applied to a present raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionKind {
    /// Numeric field read from a string
    ParsedFromString,
    /// Non-string scalar turned into text
    Stringified,
    /// Fractional number truncated for an integer field
    Truncated,
    /// Rating moved into 1..=5
    Clamped,
    /// Value of an unusable kind replaced by the field default
    Discarded,
    /// Comma-separated text split into a tag list
    SplitFromString,
    /// Identifier or timestamp generated because none was usable
    Generated,
}

impl fmt::Display for CoercionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CoercionKind::ParsedFromString => "parsed from string",
            CoercionKind::Stringified => "stringified",
            CoercionKind::Truncated => "truncated to integer",
            CoercionKind::Clamped => "clamped to 1..5",
            CoercionKind::Discarded => "discarded",
            CoercionKind::SplitFromString => "split from comma-separated string",
            CoercionKind::Generated => "generated",
        };
        f.write_str(text)
    }
}

/// A single coercion, with the canonical path of the affected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coercion {
    /// Canonical field path, e.g. `density` or `evaluations[0].rating`
    pub field: String,
    pub kind: CoercionKind,
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// A decoded record plus the coercions applied to produce it
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub value: T,
    pub coercions: Vec<Coercion>,
}

/// Normalize any JSON value into a canonical [`Item`]
pub fn normalize_item(raw: &Value) -> Item {
    decode_item(raw).value
}

/// Normalize any JSON value into a canonical [`Evaluation`]
pub fn normalize_evaluation(raw: &Value) -> Evaluation {
    let mut decoder = Decoder::default();
    decoder.evaluation(raw)
}

/// Decode any JSON value into an [`Item`], reporting coercions
pub fn decode_item(raw: &Value) -> Decoded<Item> {
    let mut decoder = Decoder::default();
    let value = decoder.item(raw);
    Decoded {
        value,
        coercions: decoder.coercions,
    }
}

/// Look up the first non-null value among a field's aliases
///
/// Non-object documents have no fields.
pub fn field<'a>(raw: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    let object = raw.as_object()?;
    aliases
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// JavaScript-style truthiness used by the original documents' defaults
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Default)]
struct Decoder {
    coercions: Vec<Coercion>,
    scope: String,
}

impl Decoder {
    fn note(&mut self, field: &str, kind: CoercionKind) {
        self.coercions.push(Coercion {
            field: format!("{}{}", self.scope, field),
            kind,
        });
    }

    fn item(&mut self, raw: &Value) -> Item {
        let id = self.id(field(raw, keys::ID));
        let ts = self.ts(field(raw, keys::TS));

        Item {
            id,
            ts,
            name: self.text("name", field(raw, keys::NAME), true),
            producer: self.text("producer", field(raw, keys::PRODUCER), true),
            origin: self.text("origin", field(raw, keys::ORIGIN), true),
            variety: self.text("variety", field(raw, keys::VARIETY), true),
            process: self.text("process", field(raw, keys::PROCESS), true),
            roast_date: self.text("roastDate", field(raw, keys::ROAST_DATE), false),
            tasting_date: self.text("tastingDate", field(raw, keys::TASTING_DATE), false),
            roaster: self.text("roaster", field(raw, keys::ROASTER), true),
            density: self.float("density", field(raw, keys::DENSITY)),
            size: self.int("size", field(raw, keys::SIZE)),
            humidity: self.float("humidity", field(raw, keys::HUMIDITY)),
            agtron: self.int("agtron", field(raw, keys::AGTRON)),
            roast_level: self.text("roastLevel", field(raw, keys::ROAST_LEVEL), true),
            defects: self.text("defects", field(raw, keys::DEFECTS), true),
            profile: self.text("profile", field(raw, keys::PROFILE), true),
            impressions: self.text("impressions", field(raw, keys::IMPRESSIONS), true),
            tags: self.tags(field(raw, keys::TAGS)),
            evaluations: self.evaluations(field(raw, keys::EVALUATIONS)),
        }
    }

    fn evaluations(&mut self, value: Option<&Value>) -> Vec<Evaluation> {
        match value {
            None => Vec::new(),
            Some(Value::Array(entries)) => {
                let mut out = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    self.scope = format!("evaluations[{}].", index);
                    out.push(self.evaluation(entry));
                }
                self.scope.clear();
                out
            }
            Some(_) => {
                self.note("evaluations", CoercionKind::Discarded);
                Vec::new()
            }
        }
    }

    fn evaluation(&mut self, raw: &Value) -> Evaluation {
        Evaluation {
            id: self.id(field(raw, keys::ID)),
            method: self.text("method", field(raw, keys::METHOD), true),
            rating: self.rating(field(raw, keys::RATING)),
            grind_size: self.int("grindSize", field(raw, keys::GRIND_SIZE)),
            dose: self.float("dose", field(raw, keys::DOSE)),
            beverage_yield: self.float("yield", field(raw, keys::YIELD)),
            time: self.int("time", field(raw, keys::TIME)),
            water_temp: self.float("waterTemp", field(raw, keys::WATER_TEMP)),
            best_use: self.text("bestUse", field(raw, keys::BEST_USE), true),
            comments: self.text("comments", field(raw, keys::COMMENTS), true),
        }
    }

    fn id(&mut self, value: Option<&Value>) -> String {
        match value {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(v @ Value::Number(n)) if is_truthy(v) => {
                self.note("id", CoercionKind::Stringified);
                n.to_string()
            }
            _ => {
                self.note("id", CoercionKind::Generated);
                uid::short_id()
            }
        }
    }

    fn ts(&mut self, value: Option<&Value>) -> i64 {
        let parsed = match value {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => {
                let parsed = s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64);
                if parsed.is_some() {
                    self.note("_ts", CoercionKind::ParsedFromString);
                }
                parsed
            }
            _ => None,
        };

        match parsed {
            Some(ts) if ts != 0 => ts,
            _ => {
                self.note("_ts", CoercionKind::Generated);
                time::now_millis()
            }
        }
    }

    fn text(&mut self, name: &str, value: Option<&Value>, trim: bool) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) if trim => s.trim().to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Bool(_) | Value::Number(_))) => {
                if is_truthy(v) {
                    self.note(name, CoercionKind::Stringified);
                    v.to_string()
                } else {
                    String::new()
                }
            }
            Some(Value::Array(_) | Value::Object(_)) => {
                self.note(name, CoercionKind::Discarded);
                String::new()
            }
        }
    }

    fn float(&mut self, name: &str, value: Option<&Value>) -> Option<f64> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
            Some(Value::String(s)) => {
                let parsed = lenient::parse_float(s);
                let kind = if parsed.is_some() {
                    CoercionKind::ParsedFromString
                } else {
                    CoercionKind::Discarded
                };
                self.note(name, kind);
                parsed
            }
            Some(_) => {
                self.note(name, CoercionKind::Discarded);
                None
            }
        }
    }

    fn int(&mut self, name: &str, value: Option<&Value>) -> Option<i64> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Some(i);
                }
                let f = n.as_f64().filter(|f| f.is_finite())?;
                if f.fract() != 0.0 {
                    self.note(name, CoercionKind::Truncated);
                }
                Some(f.trunc() as i64)
            }
            Some(Value::String(s)) => {
                let parsed = lenient::parse_int(s);
                let kind = if parsed.is_some() {
                    CoercionKind::ParsedFromString
                } else {
                    CoercionKind::Discarded
                };
                self.note(name, kind);
                parsed
            }
            Some(_) => {
                self.note(name, CoercionKind::Discarded);
                None
            }
        }
    }

    /// 0 means unrated and is never clamped; any other number lands in 1..=5
    fn rating(&mut self, value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => 0,
            Some(Value::Number(n)) => {
                let raw = n.as_f64().unwrap_or(0.0);
                if raw == 0.0 {
                    return 0;
                }
                let truncated = raw.trunc();
                let clamped = truncated.clamp(1.0, 5.0);
                if clamped != truncated {
                    self.note("rating", CoercionKind::Clamped);
                } else if truncated != raw {
                    self.note("rating", CoercionKind::Truncated);
                }
                clamped as u8
            }
            Some(_) => {
                self.note("rating", CoercionKind::Discarded);
                0
            }
        }
    }

    fn tags(&mut self, value: Option<&Value>) -> Vec<String> {
        match value {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => {
                let mut tags = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        Value::String(s) => tags.push(s.clone()),
                        Value::Number(_) | Value::Bool(_) => {
                            self.note("tags", CoercionKind::Stringified);
                            tags.push(entry.to_string());
                        }
                        _ => self.note("tags", CoercionKind::Discarded),
                    }
                }
                tags
            }
            Some(Value::String(s)) => {
                self.note("tags", CoercionKind::SplitFromString);
                split_tags(s)
            }
            Some(v @ (Value::Number(_) | Value::Bool(_))) => {
                if is_truthy(v) {
                    self.note("tags", CoercionKind::SplitFromString);
                    split_tags(&v.to_string())
                } else {
                    Vec::new()
                }
            }
            Some(Value::Object(_)) => {
                self.note("tags", CoercionKind::Discarded);
                Vec::new()
            }
        }
    }
}

/// Split comma-separated tags, trimming and dropping empty segments
pub fn split_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
