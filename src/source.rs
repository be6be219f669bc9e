//! Stat sources
//!
//! The panel never reads the host page itself; it pulls snapshots from a
//! `StatSource` (synchronous) or an `AsyncStatSource` (returns a local future).
//! Scraping live values is left to whichever implementation is plugged in.

use futures::future::{self, LocalBoxFuture};
use thiserror::Error;

use crate::constants::gauge;
use crate::snapshot::StatSnapshot;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The source could not produce a snapshot this time
    #[error("stat source unavailable: {0}")]
    Unavailable(String),
}

pub trait StatSource {
    fn fetch(&self) -> Result<StatSnapshot, SourceError>;
}

pub trait AsyncStatSource {
    fn fetch(&self) -> LocalBoxFuture<'static, Result<StatSnapshot, SourceError>>;
}

impl<F> StatSource for F
where
    F: Fn() -> Result<StatSnapshot, SourceError>,
{
    fn fetch(&self) -> Result<StatSnapshot, SourceError> {
        self()
    }
}

/// Source that always returns the same snapshot
#[derive(Debug, Clone)]
pub struct FixedStatSource {
    snapshot: StatSnapshot,
}

impl FixedStatSource {
    pub fn new(snapshot: StatSnapshot) -> Self {
        Self { snapshot }
    }

    /// Stand-in values used until a real page scraper is plugged in
    pub fn placeholder() -> Self {
        Self::new(
            StatSnapshot::new()
                .with(gauge::ENERGY, 150.0, 160.0)
                .with(gauge::NERVE, 25.0, 50.0)
                .with(gauge::HAPPY, 5000.0, 5000.0)
                .with(gauge::LIFE, 850.0, 1000.0),
        )
    }
}

impl StatSource for FixedStatSource {
    fn fetch(&self) -> Result<StatSnapshot, SourceError> {
        Ok(self.snapshot.clone())
    }
}

impl AsyncStatSource for FixedStatSource {
    fn fetch(&self) -> LocalBoxFuture<'static, Result<StatSnapshot, SourceError>> {
        Box::pin(future::ready(Ok(self.snapshot.clone())))
    }
}

/// Reads a JSON snapshot file on every fetch (preview tool)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AsyncStatSource for JsonFileSource {
    fn fetch(&self) -> LocalBoxFuture<'static, Result<StatSnapshot, SourceError>> {
        let path = self.path.clone();
        Box::pin(async move {
            let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
                SourceError::Unavailable(format!("cannot read {}: {e}", path.display()))
            })?;
            StatSnapshot::from_json(&contents)
        })
    }
}
