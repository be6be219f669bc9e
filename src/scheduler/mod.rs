//! Refresh scheduler - one immediate render, then a render per timer tick
//!
//! Ticks run on the host's single-threaded event loop. A failed fetch skips
//! that tick only; the interval keeps running until the `CancelToken` fires.

pub mod timer;
#[cfg(not(target_arch = "wasm32"))]
pub mod tokio_timers;

pub use timer::{TimerError, TimerHost};
#[cfg(not(target_arch = "wasm32"))]
pub use tokio_timers::{TokioSpawner, TokioTimers};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use futures::task::{LocalSpawn, LocalSpawnExt};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::PanelConfig;
use crate::dom::Dom;
use crate::panel::PanelRenderer;
use crate::snapshot::StatSnapshot;
use crate::source::{AsyncStatSource, SourceError, StatSource};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error("failed to spawn stat fetch: {0}")]
    Spawn(String),
}

struct CancelState {
    cancelled: Cell<bool>,
    clear: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Stops a running scheduler. Cloning shares the same underlying timer.
#[derive(Clone)]
pub struct CancelToken {
    state: Rc<CancelState>,
}

impl CancelToken {
    fn new() -> Self {
        Self {
            state: Rc::new(CancelState {
                cancelled: Cell::new(false),
                clear: RefCell::new(None),
            }),
        }
    }

    fn arm<T: TimerHost>(&self, timers: T, handle: T::Handle) {
        *self.state.clear.borrow_mut() = Some(Box::new(move || timers.clear_interval(handle)));
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Stop all future ticks. Calling it again is a no-op.
    pub fn cancel(&self) {
        if self.state.cancelled.replace(true) {
            return;
        }
        let clear = self.state.clear.borrow_mut().take();
        if let Some(clear) = clear {
            clear();
        }
        info!("Stats panel refresh cancelled");
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Arms the refresh interval on a `TimerHost`
#[derive(Debug, Clone)]
pub struct RefreshScheduler<T: TimerHost> {
    timers: T,
}

impl<T: TimerHost> RefreshScheduler<T> {
    pub fn new(timers: T) -> Self {
        Self { timers }
    }

    /// Render once now, then on every `config.refresh_interval()`
    pub fn start<S, D>(
        &self,
        config: &PanelConfig,
        source: S,
        renderer: Rc<RefCell<PanelRenderer<D>>>,
    ) -> Result<CancelToken, ScheduleError>
    where
        S: StatSource + 'static,
        D: Dom + 'static,
    {
        let token = CancelToken::new();
        let tick_token = token.clone();
        let tick_renderer = Rc::clone(&renderer);
        let tick_source = Rc::new(source);
        let first_source = Rc::clone(&tick_source);
        let mut tick = 0u64;
        // Armed before the first render so a failure leaves nothing on the page
        let handle = self.timers.set_interval(
            config.refresh_interval(),
            Box::new(move || {
                if tick_token.is_cancelled() {
                    return;
                }
                tick += 1;
                refresh(&tick_renderer, tick, tick_source.fetch());
            }),
        )?;
        token.arm(self.timers.clone(), handle);
        refresh(&renderer, 0, first_source.fetch());

        info!(
            interval_secs = config.refresh_interval().as_secs_f64(),
            gauges = config.visible_gauges().len(),
            "Stats panel refresh started"
        );
        Ok(token)
    }

    /// Like `start`, for sources whose fetch completes later.
    ///
    /// Every tick starts a fresh fetch and aborts the one still outstanding,
    /// so only the newest snapshot is rendered and a fetch that never settles
    /// cannot stall the panel. A fetch that resolves after cancellation is
    /// discarded.
    pub fn start_async<S, D, P>(
        &self,
        config: &PanelConfig,
        source: S,
        renderer: Rc<RefCell<PanelRenderer<D>>>,
        spawner: P,
    ) -> Result<CancelToken, ScheduleError>
    where
        S: AsyncStatSource + 'static,
        D: Dom + 'static,
        P: LocalSpawn + 'static,
    {
        let token = CancelToken::new();
        let fetcher = Rc::new(AsyncFetcher {
            source,
            renderer,
            spawner,
            latest: Rc::new(Cell::new(0)),
            pending: RefCell::new(None),
            token: token.clone(),
        });

        let tick_fetcher = Rc::clone(&fetcher);
        let mut tick = 0u64;
        let handle = self.timers.set_interval(
            config.refresh_interval(),
            Box::new(move || {
                if tick_fetcher.token.is_cancelled() {
                    return;
                }
                tick += 1;
                if let Err(e) = tick_fetcher.tick(tick) {
                    error!(tick, error = %e, "Stats refresh tick failed");
                }
            }),
        )?;
        token.arm(self.timers.clone(), handle);

        if let Err(e) = fetcher.tick(0) {
            token.cancel();
            return Err(e);
        }

        info!(
            interval_secs = config.refresh_interval().as_secs_f64(),
            gauges = config.visible_gauges().len(),
            "Stats panel refresh started (async source)"
        );
        Ok(token)
    }
}

struct AsyncFetcher<S, D: Dom, P> {
    source: S,
    renderer: Rc<RefCell<PanelRenderer<D>>>,
    spawner: P,
    /// Tick number of the newest fetch; older results are stale
    latest: Rc<Cell<u64>>,
    pending: RefCell<Option<AbortHandle>>,
    token: CancelToken,
}

impl<S, D, P> AsyncFetcher<S, D, P>
where
    S: AsyncStatSource + 'static,
    D: Dom + 'static,
    P: LocalSpawn,
{
    fn tick(&self, tick: u64) -> Result<(), ScheduleError> {
        if let Some(previous) = self.pending.borrow_mut().take() {
            previous.abort();
        }
        self.latest.set(tick);

        let (abort, registration) = AbortHandle::new_pair();
        let pending = Abortable::new(self.source.fetch(), registration);
        *self.pending.borrow_mut() = Some(abort);

        let renderer = Rc::clone(&self.renderer);
        let latest = Rc::clone(&self.latest);
        let token = self.token.clone();
        let task = async move {
            let Ok(fetched) = pending.await else {
                debug!(tick, "Fetch superseded before it settled");
                return;
            };
            if token.is_cancelled() {
                debug!(tick, "Discarding snapshot fetched after cancel");
                return;
            }
            if latest.get() != tick {
                debug!(tick, latest = latest.get(), "Discarding stale snapshot");
                return;
            }
            refresh(&renderer, tick, fetched);
        };

        self.spawner
            .spawn_local(task)
            .map_err(|e| ScheduleError::Spawn(e.to_string()))
    }
}

impl<S, D: Dom, P> Drop for AsyncFetcher<S, D, P> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().take() {
            pending.abort();
        }
    }
}

/// Apply one fetch result. Errors are logged and the previous content stays.
fn refresh<D: Dom>(
    renderer: &RefCell<PanelRenderer<D>>,
    tick: u64,
    fetched: Result<StatSnapshot, SourceError>,
) {
    let snapshot = match fetched {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(tick, error = %e, "Stat source failed, keeping previous panel content");
            return;
        }
    };
    let Ok(mut renderer) = renderer.try_borrow_mut() else {
        error!(tick, "Panel renderer busy, skipping tick");
        return;
    };
    if let Err(e) = renderer.render(&snapshot) {
        error!(tick, error = %e, "Failed to render stats panel");
    }
}
