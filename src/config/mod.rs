//! Configuration for the stats panel
//!
//! This module provides two layers:
//! - **options**: `PanelOptions`, the loosely typed surface handed over by the embedding script
//! - **panel**: `PanelConfig`, the validated read-only configuration the core runs on

pub mod options;
pub mod panel;

// Re-export commonly used types
#[cfg(not(target_arch = "wasm32"))]
pub use options::load_options_file;
pub use options::PanelOptions;
pub use panel::{ConfigError, Corner, PanelConfig};
