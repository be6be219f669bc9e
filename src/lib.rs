#![cfg_attr(not(target_arch = "wasm32"), forbid(unsafe_code))]

//! Auto-refreshing vitals overlay for a host web page
//!
//! A `PanelRenderer` owns one overlay root and rebuilds its gauge blocks from
//! each `StatSnapshot`. A `RefreshScheduler` pulls snapshots from a
//! `StatSource` on a fixed interval, and `AppState` ties both to a document
//! once it is ready. The browser build exports `mountQuickStats`; the native
//! build renders into `MemoryDom` for previews and tests.

pub mod app;
pub mod config;
pub mod constants;
pub mod dom;
pub mod gauge;
pub mod logging;
pub mod panel;
pub mod ready;
pub mod scheduler;
pub mod snapshot;
pub mod source;
pub mod style;
pub mod vnode;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{AppState, Host, InitError};
pub use config::{ConfigError, Corner, PanelConfig, PanelOptions};
pub use dom::{Dom, DomError, MemoryDom};
pub use gauge::GaugeSpec;
pub use panel::{PanelHandle, PanelRenderer, RenderReport};
pub use ready::ReadySignal;
pub use scheduler::{CancelToken, RefreshScheduler, ScheduleError, TimerHost};
pub use snapshot::{StatSnapshot, Vital};
pub use source::{AsyncStatSource, FixedStatSource, SourceError, StatSource};
