//! # Vitrine Common Library
//!
//! Shared code for the Vitrine catalog tools including:
//! - Canonical item/evaluation model
//! - Tolerant normalization of raw JSON documents
//! - Non-blocking validation warnings
//! - Rating aggregation and display formatters
//! - Configuration loading
//! - Utility functions

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod time;
pub mod uid;
pub mod validate;

pub use aggregate::aggregate_rating;
pub use error::{Error, Result};
pub use format::{format_date, star_glyphs};
pub use model::{Evaluation, Item};
pub use normalize::{
    decode_item, normalize_evaluation, normalize_item, Coercion, CoercionKind, Decoded,
};
pub use validate::{validate_item, validate_raw};
