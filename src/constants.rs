//! Application-wide constants
//!
//! This module contains the fixed ids, class names and default values shared
//! by the renderer, the stylesheet and the configuration layer.

/// Panel root and stylesheet element identifiers
pub mod panel {
    /// DOM id of the overlay root (looked up on every `ensure_panel`)
    pub const ROOT_ID: &str = "pytorn-stats-panel";

    /// DOM id of the injected `<style>` element
    pub const STYLE_ID: &str = "pytorn-stats-style";

    /// Tag used for the root and every block-level node
    pub const BLOCK_TAG: &str = "div";

    /// Tag used for inline text nodes (label, value)
    pub const INLINE_TAG: &str = "span";
}

/// CSS class names the stylesheet must honor
pub mod css {
    /// Root panel class (also set as id)
    pub const PANEL: &str = "pytorn-stats-panel";

    /// One gauge block
    pub const STAT: &str = "pytorn-stat";

    /// Gauge label span
    pub const STAT_LABEL: &str = "pytorn-stat-label";

    /// Gauge value span
    pub const STAT_VALUE: &str = "pytorn-stat-value";

    /// Progress track
    pub const PROGRESS: &str = "pytorn-progress";

    /// Progress fill inside the track
    pub const PROGRESS_BAR: &str = "pytorn-progress-bar";

    /// Prefix for per-gauge modifier classes (`pytorn-progress-energy`, ...)
    pub const PROGRESS_MODIFIER_PREFIX: &str = "pytorn-progress-";
}

/// Gauge keys of the four built-in vitals
pub mod gauge {
    pub const ENERGY: &str = "energy";
    pub const NERVE: &str = "nerve";
    pub const HAPPY: &str = "happy";
    pub const LIFE: &str = "life";

    /// Suffix of the maximum field in the flat snapshot form (`energyMax`)
    pub const FLAT_MAX_SUFFIX: &str = "Max";
}

/// Configuration defaults
pub mod defaults {
    /// Seconds between refresh ticks
    pub const REFRESH_INTERVAL_SECS: f64 = 30.0;

    /// Log level used when none is configured
    pub const LOG_LEVEL: &str = "info";
}

/// Browser host constants
pub mod host {
    /// Event fired once the document has been parsed
    pub const READY_EVENT: &str = "DOMContentLoaded";

    /// `document.readyState` while the document is still being parsed
    pub const LOADING_STATE: &str = "loading";
}
