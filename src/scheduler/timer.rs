//! Recurring timer hosts
//!
//! The scheduler arms exactly one interval per running panel through a
//! `TimerHost`: browser `setInterval`, a tokio local task, or a manual clock
//! in tests.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to arm refresh timer: {0}")]
pub struct TimerError(pub String);

pub trait TimerHost: Clone + 'static {
    type Handle: 'static;

    /// Call `tick` every `period` until the returned handle is cleared
    fn set_interval(&self, period: Duration, tick: Box<dyn FnMut()>) -> Result<Self::Handle, TimerError>;

    /// Stop the interval and release its callback
    fn clear_interval(&self, handle: Self::Handle);
}

#[cfg(test)]
pub(crate) use manual::ManualTimers;

#[cfg(test)]
mod manual {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::{TimerError, TimerHost};

    type Callback = Rc<RefCell<Box<dyn FnMut()>>>;

    struct Interval {
        id: u64,
        period: Duration,
        next_due: Duration,
        callback: Callback,
    }

    #[derive(Default)]
    struct Clock {
        now: Duration,
        next_id: u64,
        intervals: Vec<Interval>,
    }

    /// Deterministic timer host driven by `advance`
    #[derive(Clone, Default)]
    pub(crate) struct ManualTimers {
        clock: Rc<RefCell<Clock>>,
    }

    impl ManualTimers {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Number of armed intervals
        pub(crate) fn active(&self) -> usize {
            self.clock.borrow().intervals.len()
        }

        /// Move the clock forward, firing every due tick in order
        pub(crate) fn advance(&self, by: Duration) {
            let target = self.clock.borrow().now + by;
            loop {
                let due = {
                    let mut clock = self.clock.borrow_mut();
                    let next = clock
                        .intervals
                        .iter_mut()
                        .filter(|interval| interval.next_due <= target)
                        .min_by_key(|interval| interval.next_due);
                    match next {
                        Some(interval) => {
                            let fire_at = interval.next_due;
                            interval.next_due += interval.period;
                            let callback = Rc::clone(&interval.callback);
                            clock.now = fire_at;
                            Some(callback)
                        }
                        None => None,
                    }
                };
                match due {
                    Some(callback) => (callback.borrow_mut())(),
                    None => break,
                }
            }
            self.clock.borrow_mut().now = target;
        }
    }

    impl TimerHost for ManualTimers {
        type Handle = u64;

        fn set_interval(&self, period: Duration, tick: Box<dyn FnMut()>) -> Result<u64, TimerError> {
            if period.is_zero() {
                return Err(TimerError("zero period".to_string()));
            }
            let mut clock = self.clock.borrow_mut();
            clock.next_id += 1;
            let id = clock.next_id;
            let next_due = clock.now + period;
            clock.intervals.push(Interval {
                id,
                period,
                next_due,
                callback: Rc::new(RefCell::new(tick)),
            });
            Ok(id)
        }

        fn clear_interval(&self, handle: u64) {
            self.clock.borrow_mut().intervals.retain(|interval| interval.id != handle);
        }
    }

    mod tests {
        use super::*;
        use std::cell::Cell;

        #[test]
        fn test_advance_fires_each_due_tick() {
            let timers = ManualTimers::new();
            let count = Rc::new(Cell::new(0));
            let counter = Rc::clone(&count);
            timers
                .set_interval(Duration::from_secs(30), Box::new(move || counter.set(counter.get() + 1)))
                .unwrap();

            timers.advance(Duration::from_secs(29));
            assert_eq!(count.get(), 0);
            timers.advance(Duration::from_secs(1));
            assert_eq!(count.get(), 1);
            timers.advance(Duration::from_secs(95));
            assert_eq!(count.get(), 4);
        }

        #[test]
        fn test_clear_inside_callback_stops_interval() {
            let timers = ManualTimers::new();
            let count = Rc::new(Cell::new(0));
            let handle = Rc::new(Cell::new(0u64));
            let (counter, host, id) = (Rc::clone(&count), timers.clone(), Rc::clone(&handle));
            handle.set(
                timers
                    .set_interval(
                        Duration::from_secs(1),
                        Box::new(move || {
                            counter.set(counter.get() + 1);
                            host.clear_interval(id.get());
                        }),
                    )
                    .unwrap(),
            );
            timers.advance(Duration::from_secs(10));
            assert_eq!(count.get(), 1);
            assert_eq!(timers.active(), 0);
        }
    }
}
