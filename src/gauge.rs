use serde::{Deserialize, Serialize};

use crate::constants::{css, gauge};

/// Static descriptor of one vital gauge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeSpec {
    pub key: String,
    pub label: String,
    /// Per-gauge modifier class on the progress track; derived from the key when empty
    #[serde(default)]
    pub css_class: String,
}

impl GaugeSpec {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            css_class: modifier_class(key),
        }
    }

    /// Fill in the derived modifier class if the descriptor left it blank
    pub(crate) fn with_default_class(mut self) -> Self {
        if self.css_class.trim().is_empty() {
            self.css_class = modifier_class(&self.key);
        }
        self
    }
}

fn modifier_class(key: &str) -> String {
    format!("{}{}", css::PROGRESS_MODIFIER_PREFIX, key)
}

/// The four built-in vitals in display order
pub fn default_gauges() -> Vec<GaugeSpec> {
    vec![
        GaugeSpec::new(gauge::ENERGY, "Energy"),
        GaugeSpec::new(gauge::NERVE, "Nerve"),
        GaugeSpec::new(gauge::HAPPY, "Happy"),
        GaugeSpec::new(gauge::LIFE, "Life"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gauges_order_and_classes() {
        let keys: Vec<_> = default_gauges().into_iter().map(|g| (g.key, g.css_class)).collect();
        assert_eq!(
            keys,
            vec![
                ("energy".to_string(), "pytorn-progress-energy".to_string()),
                ("nerve".to_string(), "pytorn-progress-nerve".to_string()),
                ("happy".to_string(), "pytorn-progress-happy".to_string()),
                ("life".to_string(), "pytorn-progress-life".to_string()),
            ]
        );
    }

    #[test]
    fn test_deserialize_without_css_class_gets_default() {
        let spec: GaugeSpec = serde_json::from_str(r#"{"key":"chain","label":"Chain"}"#).unwrap();
        assert_eq!(spec.css_class, "");
        assert_eq!(spec.with_default_class().css_class, "pytorn-progress-chain");
    }

    #[test]
    fn test_explicit_css_class_kept() {
        let spec: GaugeSpec =
            serde_json::from_str(r#"{"key":"chain","label":"Chain","cssClass":"custom"}"#).unwrap();
        assert_eq!(spec.with_default_class().css_class, "custom");
    }
}
