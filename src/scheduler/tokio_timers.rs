//! Tokio-backed timer host and spawner for the native preview tool
//!
//! Both must be used from inside a `tokio::task::LocalSet`, since ticks and
//! fetches are `!Send` like their browser counterparts.

use std::time::Duration;

use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::timer::{TimerError, TimerHost};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimers;

impl TimerHost for TokioTimers {
    type Handle = JoinHandle<()>;

    fn set_interval(&self, period: Duration, mut tick: Box<dyn FnMut()>) -> Result<JoinHandle<()>, TimerError> {
        if period.is_zero() {
            return Err(TimerError("refresh period must be non-zero".to_string()));
        }
        Ok(tokio::task::spawn_local(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            // A late tick is dropped, never replayed in a burst
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                tick();
            }
        }))
    }

    fn clear_interval(&self, handle: JoinHandle<()>) {
        handle.abort();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl LocalSpawn for TokioSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        tokio::task::spawn_local(future);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_interval_ticks_until_cleared() {
        LocalSet::new()
            .run_until(async {
                let count = Rc::new(Cell::new(0));
                let counter = Rc::clone(&count);
                let handle = TokioTimers
                    .set_interval(
                        Duration::from_secs(30),
                        Box::new(move || counter.set(counter.get() + 1)),
                    )
                    .unwrap();

                tokio::time::sleep(Duration::from_secs(65)).await;
                assert_eq!(count.get(), 2);

                TokioTimers.clear_interval(handle);
                tokio::time::sleep(Duration::from_secs(120)).await;
                assert_eq!(count.get(), 2);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_spawner_runs_future() {
        use futures::task::LocalSpawnExt;

        LocalSet::new()
            .run_until(async {
                let (tx, rx) = futures::channel::oneshot::channel();
                TokioSpawner
                    .spawn_local(async move {
                        let _ = tx.send(7);
                    })
                    .unwrap();
                assert_eq!(rx.await, Ok(7));
            })
            .await;
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(TokioTimers.set_interval(Duration::ZERO, Box::new(|| {})).is_err());
    }
}
