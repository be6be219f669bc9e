//! Options handed over by the embedding script
//!
//! Every field is optional; missing fields fall back to defaults. The field
//! names of the original userscript config (`refreshInterval`, `position`,
//! `showEnergy`...) are accepted as well.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::panel::{ConfigError, Corner, PanelConfig};
use crate::constants::{defaults, gauge};
use crate::gauge::{default_gauges, GaugeSpec};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    /// Keys of the gauges to show; takes precedence over the `show*` flags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_gauges: Option<Vec<String>>,

    #[serde(alias = "refreshInterval", skip_serializing_if = "Option::is_none")]
    pub refresh_interval_seconds: Option<f64>,

    #[serde(alias = "position", skip_serializing_if = "Option::is_none")]
    pub corner: Option<String>,

    // Legacy per-vital toggles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_energy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_nerve: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_happy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_life: Option<bool>,

    /// Replaces the built-in gauge list (list order is display order)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauges: Option<Vec<GaugeSpec>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl PanelOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(defaults::LOG_LEVEL)
    }

    fn legacy_flag(&self, key: &str) -> Option<bool> {
        match key {
            gauge::ENERGY => self.show_energy,
            gauge::NERVE => self.show_nerve,
            gauge::HAPPY => self.show_happy,
            gauge::LIFE => self.show_life,
            _ => None,
        }
    }

    fn has_legacy_flags(&self) -> bool {
        self.show_energy.is_some()
            || self.show_nerve.is_some()
            || self.show_happy.is_some()
            || self.show_life.is_some()
    }

    /// Validate into the read-only configuration
    pub fn into_config(self) -> Result<PanelConfig, ConfigError> {
        let gauges: Vec<GaugeSpec> = match &self.gauges {
            Some(custom) => custom.clone(),
            None => default_gauges(),
        };

        let visible: Vec<String> = match &self.visible_gauges {
            Some(keys) => {
                if self.has_legacy_flags() {
                    warn!("visibleGauges is set, ignoring showEnergy/showNerve/showHappy/showLife");
                }
                keys.clone()
            }
            None => gauges
                .iter()
                .filter(|spec| self.legacy_flag(&spec.key).unwrap_or(true))
                .map(|spec| spec.key.clone())
                .collect(),
        };

        let corner = match &self.corner {
            Some(name) => name.parse::<Corner>()?,
            None => Corner::default(),
        };

        let interval = self
            .refresh_interval_seconds
            .unwrap_or(defaults::REFRESH_INTERVAL_SECS);

        let config = PanelConfig::with_gauges(gauges, visible, interval, corner)?;
        debug!(
            visible = ?config.visible_gauges(),
            interval_ms = config.refresh_interval().as_millis() as u64,
            corner = %config.corner(),
            "Resolved panel options"
        );
        Ok(config)
    }
}

impl TryFrom<PanelOptions> for PanelConfig {
    type Error = ConfigError;

    fn try_from(options: PanelOptions) -> Result<Self, Self::Error> {
        options.into_config()
    }
}

/// Load options from a JSON file (preview tool)
#[cfg(not(target_arch = "wasm32"))]
pub fn load_options_file(path: &std::path::Path) -> anyhow::Result<PanelOptions> {
    use anyhow::Context;

    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read panel options from {}", path.display()))?;
    let options = serde_json::from_str::<PanelOptions>(&contents)
        .context(format!("Failed to parse panel options in {}", path.display()))?;
    Ok(options)
}
