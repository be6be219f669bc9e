//! Application state: one running panel with its renderer and cancel token
//!
//! `initialize` starts immediately when the document is already ready and
//! otherwise queues the start behind the `ReadySignal`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::task::{LocalSpawn, LocalSpawnExt};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::PanelConfig;
use crate::constants::panel;
use crate::dom::{Dom, DomError};
use crate::panel::PanelRenderer;
use crate::ready::ReadySignal;
use crate::scheduler::{CancelToken, RefreshScheduler, ScheduleError, TimerHost};
use crate::source::{AsyncStatSource, StatSource};
use crate::style::STYLESHEET;

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("failed to queue panel start: {0}")]
    Spawn(String),
}

/// Event loop services the panel runs on
#[derive(Debug, Clone)]
pub struct Host<T, P> {
    pub timers: T,
    pub spawner: P,
}

type Launch<D> = Box<dyn FnOnce(&PanelConfig, Rc<RefCell<PanelRenderer<D>>>) -> Result<CancelToken, ScheduleError>>;

pub struct AppState<D: Dom> {
    renderer: Rc<RefCell<PanelRenderer<D>>>,
    token: Rc<RefCell<Option<CancelToken>>>,
    stopped: Rc<Cell<bool>>,
}

impl<D: Dom + 'static> AppState<D> {
    /// Start a panel fed by a synchronous source
    pub fn initialize<S, T, P>(
        config: PanelConfig,
        source: S,
        dom: D,
        host: Host<T, P>,
        ready: &ReadySignal,
    ) -> Result<Self, InitError>
    where
        S: StatSource + 'static,
        T: TimerHost,
        P: LocalSpawn,
    {
        let scheduler = RefreshScheduler::new(host.timers);
        let launch: Launch<D> = Box::new(move |config, renderer| scheduler.start(config, source, renderer));
        Self::boot(config, dom, &host.spawner, ready, launch)
    }

    /// Start a panel fed by an asynchronous source
    pub fn initialize_async<S, T, P>(
        config: PanelConfig,
        source: S,
        dom: D,
        host: Host<T, P>,
        ready: &ReadySignal,
    ) -> Result<Self, InitError>
    where
        S: AsyncStatSource + 'static,
        T: TimerHost,
        P: LocalSpawn + Clone + 'static,
    {
        let scheduler = RefreshScheduler::new(host.timers);
        let spawner = host.spawner.clone();
        let launch: Launch<D> =
            Box::new(move |config, renderer| scheduler.start_async(config, source, renderer, spawner));
        Self::boot(config, dom, &host.spawner, ready, launch)
    }

    fn boot<P: LocalSpawn>(
        config: PanelConfig,
        dom: D,
        spawner: &P,
        ready: &ReadySignal,
        launch: Launch<D>,
    ) -> Result<Self, InitError> {
        let config = Rc::new(config);
        let state = Self {
            renderer: Rc::new(RefCell::new(PanelRenderer::new(dom, Rc::clone(&config)))),
            token: Rc::new(RefCell::new(None)),
            stopped: Rc::new(Cell::new(false)),
        };

        let renderer = Rc::clone(&state.renderer);
        let token = Rc::clone(&state.token);
        let start = move || -> Result<(), ScheduleError> {
            let started = launch(&config, Rc::clone(&renderer))?;
            // Only once refreshes are running, so a failed start adds nothing to the page
            inject_stylesheet(&renderer);
            *token.borrow_mut() = Some(started);
            Ok(())
        };

        if ready.is_ready() {
            start()?;
            return Ok(state);
        }

        debug!("Document not ready yet, queueing stats panel start");
        let wait = ready.wait();
        let stopped = Rc::clone(&state.stopped);
        spawner
            .spawn_local(async move {
                if !wait.await {
                    warn!("Ready signal dropped before firing, stats panel not started");
                    return;
                }
                if stopped.get() {
                    debug!("Stats panel shut down before document was ready");
                    return;
                }
                if let Err(e) = start() {
                    error!(error = %e, "Failed to start stats panel refresh");
                }
            })
            .map_err(|e| InitError::Spawn(e.to_string()))?;
        Ok(state)
    }

    pub fn renderer(&self) -> &Rc<RefCell<PanelRenderer<D>>> {
        &self.renderer
    }

    /// True once the scheduler is armed and until `shutdown`
    pub fn is_running(&self) -> bool {
        self.token
            .borrow()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Cancel refreshes and remove the panel. Safe to call more than once.
    pub fn shutdown(&self) -> Result<(), DomError> {
        self.stopped.set(true);
        let token = self.token.borrow_mut().take();
        if let Some(token) = token {
            token.cancel();
        }
        let removed = self
            .renderer
            .try_borrow()
            .map_err(|_| DomError::new("teardown", "panel renderer is busy"))?
            .teardown()?;
        if removed {
            info!("Stats panel shut down");
        }
        Ok(())
    }
}

fn inject_stylesheet<D: Dom>(renderer: &RefCell<PanelRenderer<D>>) {
    let Ok(renderer) = renderer.try_borrow() else {
        return;
    };
    match renderer.dom().inject_stylesheet(panel::STYLE_ID, STYLESHEET) {
        Ok(true) => debug!(id = panel::STYLE_ID, "Injected panel stylesheet"),
        Ok(false) => debug!(id = panel::STYLE_ID, "Panel stylesheet already present"),
        Err(e) => warn!(error = %e, "Failed to inject panel stylesheet, continuing unstyled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use crate::scheduler::timer::ManualTimers;
    use crate::scheduler::TimerError;
    use crate::source::FixedStatSource;
    use futures::executor::LocalPool;
    use std::time::Duration;

    fn host(pool: &LocalPool) -> (ManualTimers, Host<ManualTimers, futures::executor::LocalSpawner>) {
        let timers = ManualTimers::new();
        let host = Host {
            timers: timers.clone(),
            spawner: pool.spawner(),
        };
        (timers, host)
    }

    #[test]
    fn test_start_waits_for_ready() {
        let mut pool = LocalPool::new();
        let (timers, host) = host(&pool);
        let dom = MemoryDom::new();
        let ready = ReadySignal::new();
        let app = AppState::initialize(
            PanelConfig::default(),
            FixedStatSource::placeholder(),
            dom.clone(),
            host,
            &ready,
        )
        .unwrap();

        pool.run_until_stalled();
        assert_eq!(dom.body_html(), "");
        assert_eq!(dom.stylesheet(panel::STYLE_ID), None);
        assert_eq!(timers.active(), 0);
        assert!(!app.is_running());

        ready.fire();
        pool.run_until_stalled();
        assert!(dom.body_html().contains("Energy:"));
        assert!(dom.stylesheet(panel::STYLE_ID).is_some());
        assert_eq!(timers.active(), 1);
        assert!(app.is_running());
    }

    #[test]
    fn test_ready_document_starts_immediately() {
        let pool = LocalPool::new();
        let (timers, host) = host(&pool);
        let dom = MemoryDom::new();
        let app = AppState::initialize(
            PanelConfig::default(),
            FixedStatSource::placeholder(),
            dom.clone(),
            host,
            &ReadySignal::fired(),
        )
        .unwrap();
        assert!(app.is_running());
        assert_eq!(app.renderer().borrow().render_count(), 1);
        assert_eq!(timers.active(), 1);
    }

    #[test]
    fn test_shutdown_stops_timer_and_removes_panel() {
        let pool = LocalPool::new();
        let (timers, host) = host(&pool);
        let dom = MemoryDom::new();
        let app = AppState::initialize(
            PanelConfig::default(),
            FixedStatSource::placeholder(),
            dom.clone(),
            host,
            &ReadySignal::fired(),
        )
        .unwrap();

        app.shutdown().unwrap();
        assert!(!app.is_running());
        assert_eq!(timers.active(), 0);
        assert_eq!(dom.body_html(), "");
        assert_eq!(dom.live_nodes(), 0);

        timers.advance(Duration::from_secs(300));
        assert_eq!(app.renderer().borrow().render_count(), 1);
        app.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_before_ready_never_starts() {
        let mut pool = LocalPool::new();
        let (timers, host) = host(&pool);
        let dom = MemoryDom::new();
        let ready = ReadySignal::new();
        let app = AppState::initialize(
            PanelConfig::default(),
            FixedStatSource::placeholder(),
            dom.clone(),
            host,
            &ready,
        )
        .unwrap();

        app.shutdown().unwrap();
        ready.fire();
        pool.run_until_stalled();
        assert_eq!(dom.body_html(), "");
        assert_eq!(timers.active(), 0);
    }

    #[test]
    fn test_async_initialize_renders_after_fetch() {
        let mut pool = LocalPool::new();
        let (timers, host) = host(&pool);
        let dom = MemoryDom::new();
        let app = AppState::initialize_async(
            PanelConfig::default(),
            FixedStatSource::placeholder(),
            dom.clone(),
            host,
            &ReadySignal::fired(),
        )
        .unwrap();
        pool.run_until_stalled();
        assert_eq!(app.renderer().borrow().render_count(), 1);

        timers.advance(Duration::from_secs(30));
        pool.run_until_stalled();
        assert_eq!(app.renderer().borrow().render_count(), 2);
        assert!(dom.body_html().contains("5000/5000"));
    }

    #[derive(Clone)]
    struct RefusingTimers;

    impl TimerHost for RefusingTimers {
        type Handle = ();

        fn set_interval(&self, _period: Duration, _tick: Box<dyn FnMut()>) -> Result<(), TimerError> {
            Err(TimerError("interval out of range".to_string()))
        }

        fn clear_interval(&self, _handle: ()) {}
    }

    #[test]
    fn test_failed_start_leaves_page_clean() {
        let pool = LocalPool::new();
        let dom = MemoryDom::new();
        let host = Host {
            timers: RefusingTimers,
            spawner: pool.spawner(),
        };
        let result = AppState::initialize(
            PanelConfig::default(),
            FixedStatSource::placeholder(),
            dom.clone(),
            host,
            &ReadySignal::fired(),
        );

        assert!(matches!(result, Err(InitError::Schedule(ScheduleError::Timer(_)))));
        assert_eq!(dom.body_html(), "");
        assert_eq!(dom.live_nodes(), 0);
        assert_eq!(dom.stylesheet(panel::STYLE_ID), None);
    }

    #[test]
    fn test_stylesheet_injected_once_per_document() {
        let pool = LocalPool::new();
        let dom = MemoryDom::new();
        for _ in 0..2 {
            let (_timers, host) = host(&pool);
            AppState::initialize(
                PanelConfig::default(),
                FixedStatSource::placeholder(),
                dom.clone(),
                host,
                &ReadySignal::fired(),
            )
            .unwrap();
        }
        assert_eq!(dom.stylesheet(panel::STYLE_ID).as_deref(), Some(STYLESHEET));
        assert_eq!(dom.body_children().len(), 1);
    }
}
