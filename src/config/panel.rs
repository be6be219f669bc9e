//! Validated panel configuration
//!
//! `PanelConfig` is built once at startup and treated as read-only for the
//! lifetime of the panel. Changing it means re-initializing the panel.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::defaults;
use crate::gauge::{default_gauges, GaugeSpec};

/// Configuration failures; all of them prevent the panel from starting
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("refresh interval must be a positive number of seconds, got {0}")]
    InvalidRefreshInterval(f64),

    #[error("no gauges are visible, at least one is required")]
    EmptyGaugeSet,

    #[error("unknown corner '{0}' (expected top-left, top-right, bottom-left or bottom-right)")]
    UnknownCorner(String),

    #[error("visible gauge '{0}' is not defined in the gauge list")]
    UnknownGauge(String),

    #[error("gauge '{0}' is defined more than once")]
    DuplicateGauge(String),

    #[error("gauge definition has an empty key")]
    EmptyGaugeKey,

    #[error("failed to parse panel options: {0}")]
    Parse(String),
}

/// Screen corner the panel is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Placement class applied to the panel root
    pub fn css_class(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl FromStr for Corner {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Corner::ALL
            .into_iter()
            .find(|corner| corner.css_class() == wanted)
            .ok_or_else(|| ConfigError::UnknownCorner(s.to_string()))
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    gauges: Vec<GaugeSpec>,
    visible: BTreeSet<String>,
    refresh_interval: Duration,
    corner: Corner,
}

impl PanelConfig {
    /// Configuration over the four built-in vitals
    pub fn new<I, K>(visible: I, refresh_interval_secs: f64, corner: Corner) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self::with_gauges(default_gauges(), visible, refresh_interval_secs, corner)
    }

    /// Configuration over a custom gauge list; list order is display order
    pub fn with_gauges<I, K>(
        gauges: Vec<GaugeSpec>,
        visible: I,
        refresh_interval_secs: f64,
        corner: Corner,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let refresh_interval = validate_interval(refresh_interval_secs)?;
        let gauges: Vec<GaugeSpec> = gauges.into_iter().map(GaugeSpec::with_default_class).collect();

        let mut seen = BTreeSet::new();
        for gauge in &gauges {
            if gauge.key.trim().is_empty() {
                return Err(ConfigError::EmptyGaugeKey);
            }
            if !seen.insert(gauge.key.as_str()) {
                return Err(ConfigError::DuplicateGauge(gauge.key.clone()));
            }
        }

        let mut visible_keys = BTreeSet::new();
        for key in visible {
            let key = key.as_ref();
            if !seen.contains(key) {
                return Err(ConfigError::UnknownGauge(key.to_string()));
            }
            visible_keys.insert(key.to_string());
        }
        if visible_keys.is_empty() {
            return Err(ConfigError::EmptyGaugeSet);
        }

        Ok(Self {
            gauges,
            visible: visible_keys,
            refresh_interval,
            corner,
        })
    }

    /// Full gauge list in display order, visible or not
    pub fn gauges(&self) -> &[GaugeSpec] {
        &self.gauges
    }

    pub fn visible_gauges(&self) -> &BTreeSet<String> {
        &self.visible
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }

    /// Visible gauges in configured display order
    pub fn display_order(&self) -> impl Iterator<Item = &GaugeSpec> {
        self.gauges.iter().filter(|gauge| self.is_visible(&gauge.key))
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn corner(&self) -> Corner {
        self.corner
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        let gauges = default_gauges();
        let visible = gauges.iter().map(|gauge| gauge.key.clone()).collect();
        Self {
            gauges,
            visible,
            refresh_interval: Duration::from_secs_f64(defaults::REFRESH_INTERVAL_SECS),
            corner: Corner::default(),
        }
    }
}

fn validate_interval(secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidRefreshInterval(secs));
    }
    match Duration::try_from_secs_f64(secs) {
        Ok(interval) if !interval.is_zero() => Ok(interval),
        _ => Err(ConfigError::InvalidRefreshInterval(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_config() {
        let config = PanelConfig::new(["energy", "life"], 30.0, Corner::TopRight).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.corner(), Corner::TopRight);
        assert!(config.is_visible("energy"));
        assert!(!config.is_visible("nerve"));
        assert_eq!(config.gauges().len(), 4);
    }

    #[test]
    fn test_display_order_follows_gauge_list_not_visible_order() {
        let config = PanelConfig::new(["life", "energy"], 30.0, Corner::TopLeft).unwrap();
        let order: Vec<_> = config.display_order().map(|g| g.key.as_str()).collect();
        assert_eq!(order, vec!["energy", "life"]);
    }

    #[test]
    fn test_custom_gauge_without_class_gets_key_class() {
        let gauges = vec![GaugeSpec {
            key: "chain".to_string(),
            label: "Chain".to_string(),
            css_class: String::new(),
        }];
        let config = PanelConfig::with_gauges(gauges, ["chain"], 30.0, Corner::TopRight).unwrap();
        assert_eq!(config.gauges()[0].css_class, "pytorn-progress-chain");
    }

    #[test]
    fn test_fractional_interval_accepted() {
        let config = PanelConfig::new(["energy"], 0.5, Corner::TopRight).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        for secs in [0.0, -1.0, -0.0] {
            assert_eq!(
                PanelConfig::new(["energy"], secs, Corner::TopRight),
                Err(ConfigError::InvalidRefreshInterval(secs))
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_interval() {
        assert!(matches!(
            PanelConfig::new(["energy"], f64::NAN, Corner::TopRight),
            Err(ConfigError::InvalidRefreshInterval(_))
        ));
        assert!(matches!(
            PanelConfig::new(["energy"], f64::INFINITY, Corner::TopRight),
            Err(ConfigError::InvalidRefreshInterval(_))
        ));
    }

    #[test]
    fn test_rejects_interval_that_rounds_to_zero() {
        assert!(matches!(
            PanelConfig::new(["energy"], 1e-12, Corner::TopRight),
            Err(ConfigError::InvalidRefreshInterval(_))
        ));
    }

    #[test]
    fn test_rejects_empty_gauge_set() {
        let none: [&str; 0] = [];
        assert_eq!(
            PanelConfig::new(none, 30.0, Corner::TopRight),
            Err(ConfigError::EmptyGaugeSet)
        );
    }

    #[test]
    fn test_rejects_unknown_gauge() {
        assert_eq!(
            PanelConfig::new(["energy", "stamina"], 30.0, Corner::TopRight),
            Err(ConfigError::UnknownGauge("stamina".to_string()))
        );
    }

    #[test]
    fn test_rejects_duplicate_gauge_definitions() {
        let gauges = vec![GaugeSpec::new("energy", "Energy"), GaugeSpec::new("energy", "Again")];
        assert_eq!(
            PanelConfig::with_gauges(gauges, ["energy"], 30.0, Corner::TopRight),
            Err(ConfigError::DuplicateGauge("energy".to_string()))
        );
    }

    #[test]
    fn test_rejects_blank_gauge_key() {
        let gauges = vec![GaugeSpec::new(" ", "Blank")];
        assert_eq!(
            PanelConfig::with_gauges(gauges, [" "], 30.0, Corner::TopRight),
            Err(ConfigError::EmptyGaugeKey)
        );
    }

    #[test]
    fn test_extended_gauge_list() {
        let mut gauges = default_gauges();
        gauges.push(GaugeSpec::new("chain", "Chain"));
        let config = PanelConfig::with_gauges(gauges, ["chain", "energy"], 10.0, Corner::BottomLeft).unwrap();
        let order: Vec<_> = config.display_order().map(|g| g.key.as_str()).collect();
        assert_eq!(order, vec!["energy", "chain"]);
    }

    #[test]
    fn test_corner_parse() {
        assert_eq!("top-left".parse::<Corner>(), Ok(Corner::TopLeft));
        assert_eq!(" Bottom-Right ".parse::<Corner>(), Ok(Corner::BottomRight));
        assert_eq!(
            "middle".parse::<Corner>(),
            Err(ConfigError::UnknownCorner("middle".to_string()))
        );
    }

    #[test]
    fn test_corner_display_matches_css_class() {
        for corner in Corner::ALL {
            assert_eq!(corner.to_string(), corner.css_class());
        }
    }

    #[test]
    fn test_default_config_shows_all_four() {
        let config = PanelConfig::default();
        assert_eq!(config.visible_gauges().len(), 4);
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.corner(), Corner::TopRight);
    }
}
