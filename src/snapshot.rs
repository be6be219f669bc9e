//! Stat snapshots
//!
//! A `StatSnapshot` is produced fresh by the stat source on every refresh and
//! never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::gauge::FLAT_MAX_SUFFIX;
use crate::source::SourceError;

/// Current and maximum value of one vital
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vital {
    pub current: f64,
    pub maximum: f64,
}

impl Vital {
    pub fn new(current: f64, maximum: f64) -> Self {
        Self { current, maximum }
    }

    /// Bar fill in `[0, 1]`; 0 when the maximum is not positive or either value is NaN
    pub fn fill_ratio(&self) -> f64 {
        if self.maximum.is_nan() || self.maximum <= 0.0 {
            return 0.0;
        }
        let ratio = self.current / self.maximum;
        if ratio.is_nan() || ratio <= 0.0 {
            0.0
        } else {
            ratio.min(1.0)
        }
    }

    /// Value text shown next to the label
    pub fn value_text(&self) -> String {
        format!("{}/{}", self.current, self.maximum)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatSnapshot {
    entries: BTreeMap<String, Vital>,
}

impl StatSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used while assembling a snapshot
    pub fn with(mut self, key: &str, current: f64, maximum: f64) -> Self {
        self.entries.insert(key.to_string(), Vital::new(current, maximum));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Vital> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vital)> {
        self.entries.iter().map(|(key, vital)| (key.as_str(), vital))
    }

    /// Parse a snapshot in either the nested form
    /// `{"energy": {"current": 150, "maximum": 160}}` or the flat form
    /// `{"energy": 150, "energyMax": 160}`
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SourceError::Unavailable(format!("snapshot is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, SourceError> {
        let Value::Object(fields) = value else {
            return Err(SourceError::Unavailable(
                "snapshot must be a JSON object".to_string(),
            ));
        };

        let nested = fields.values().filter(|value| value.is_object()).count();
        if nested == fields.len() {
            return serde_json::from_value(Value::Object(fields))
                .map_err(|e| SourceError::Unavailable(format!("malformed snapshot entry: {e}")));
        }
        if nested > 0 {
            return Err(SourceError::Unavailable(
                "snapshot mixes nested and flat entries".to_string(),
            ));
        }

        // Flat form: every numeric `key` paired with a numeric `keyMax`
        let mut snapshot = Self::new();
        for (key, current) in &fields {
            if key.ends_with(FLAT_MAX_SUFFIX) {
                continue;
            }
            let maximum = fields.get(&format!("{key}{FLAT_MAX_SUFFIX}"));
            if let (Some(current), Some(maximum)) = (current.as_f64(), maximum.and_then(Value::as_f64)) {
                snapshot.entries.insert(key.clone(), Vital::new(current, maximum));
            }
        }
        if snapshot.is_empty() {
            return Err(SourceError::Unavailable(
                "snapshot has no recognizable vitals".to_string(),
            ));
        }
        Ok(snapshot)
    }
}
