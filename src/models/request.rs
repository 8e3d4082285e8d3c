// src/models/request.rs

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Message returned when a key falls outside the allowed alphabet.
pub const INVALID_KEY_MESSAGE: &str =
    "Filter keys may only contain letters, digits, '_' and '-'";

/// Filter keys mapped to their integer values.
pub type FilterMap = HashMap<String, i64>;

static FILTER_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*$").expect("filter key pattern is valid"));

/// DTO for searching quiz attempts.
///
/// The filter set travels as two parallel lists: `key[i]` is paired with
/// `value[i]`. Recognized keys are `quizid` (required), `userid`,
/// `before_timestamp` and `after_timestamp`; other keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SearchAttemptsRequest {
    /// Parameter names.
    #[validate(custom(function = validate_keys))]
    #[schema(example = json!(["quizid", "userid"]))]
    pub key: Vec<String>,

    /// Parameter values, positionally matching `key`.
    #[schema(example = json!([3, 12]))]
    pub value: Vec<i64>,
}

fn validate_keys(keys: &[String]) -> Result<(), validator::ValidationError> {
    for key in keys {
        if !FILTER_KEY_PATTERN.is_match(key) {
            return Err(validator::ValidationError::new("invalid_filter_key"));
        }
    }
    Ok(())
}

impl SearchAttemptsRequest {
    pub fn new<K: Into<String>>(pairs: impl IntoIterator<Item = (K, i64)>) -> Self {
        let (key, value) = pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self { key, value }
    }

    /// Pairs the two lists into a map. A key given more than once keeps its
    /// last value.
    pub fn into_filters(self) -> Result<FilterMap, AppError> {
        self.validate()?;

        if self.key.len() != self.value.len() {
            return Err(AppError::MalformedRequest(format!(
                "The key and value lists must have the same length (got {} keys and {} values)",
                self.key.len(),
                self.value.len()
            )));
        }

        Ok(self.key.into_iter().zip(self.value).collect())
    }
}
