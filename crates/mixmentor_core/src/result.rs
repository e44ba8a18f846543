//! Typed view of the analysis result document delivered with a `done` status.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultParseError {
    #[error("result payload missing")]
    Missing,
    #[error("malformed result payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    pub summary: String,
    /// Keeps the document's key order.
    pub scores: IndexMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Recommendations,
    #[serde(default, alias = "bpmKey")]
    pub bpm_key: Option<BpmKey>,
    #[serde(default, alias = "abCompare")]
    pub ab_compare: Option<AbCompare>,
    #[serde(default)]
    pub metrics: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub recording: Option<Vec<String>>,
    #[serde(default)]
    pub mixing: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmKey {
    pub bpm: f64,
    pub confidence: f64,
    pub key: String,
    pub key_confidence: f64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbCompare {
    pub loudness_diff_lufs: f64,
    pub true_peak_diff_db: f64,
    pub spectral_diff_summary: String,
    pub stereo_diff_summary: String,
    pub dynamics_diff_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_suggestions: Vec<String>,
}

impl ResultDocument {
    /// Reads a result out of a status payload.
    ///
    /// `summary` and `scores` are required; everything else may be absent or null.
    pub fn from_value(value: Option<Value>) -> Result<Self, ResultParseError> {
        match value {
            None | Some(Value::Null) => Err(ResultParseError::Missing),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }
}

/// Treats an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
