//! Periodic countdown driver.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// Returned by the tick callback to keep or stop the ticker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Halt,
}

#[derive(Debug)]
struct ArmedTicker {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Owner of the single cancelable ticker task.
///
/// Every arming gets a new generation which is passed to each tick. A tick
/// whose generation is no longer [`current`](Self::is_current) was already
/// in flight when the ticker was cancelled and must be ignored.
#[derive(Debug)]
pub struct CountdownScheduler {
    period: Duration,
    generation: u64,
    armed: Option<ArmedTicker>,
}

/// Shortest accepted period; `interval_at` panics on zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl CountdownScheduler {
    /// Creates an unarmed scheduler. A zero `period` is raised to one
    /// millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            generation: 0,
            armed: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true while a ticker task is owned.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Returns true if `generation` belongs to the live ticker.
    pub fn is_current(&self, generation: u64) -> bool {
        self.armed
            .as_ref()
            .is_some_and(|armed| armed.generation == generation)
    }

    /// Spawns a ticker calling `on_tick` once per period, first after one
    /// full period. Any previous ticker is cancelled first.
    ///
    /// Returns the generation of the new ticker.
    pub fn arm<F, Fut>(&mut self, mut on_tick: F) -> u64
    where
        F: FnMut(u64) -> Fut + Send + 'static,
        Fut: Future<Output = TickFlow> + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        // The first deadline is taken now, not when the task is first polled.
        let first = Instant::now() + period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if on_tick(generation).await == TickFlow::Halt {
                    break;
                }
            }
        });

        debug!(generation, ?period, "countdown armed");
        self.armed = Some(ArmedTicker { generation, handle });
        generation
    }

    /// Aborts the live ticker. Returns false if none was armed.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(armed) => {
                armed.handle.abort();
                debug!(generation = armed.generation, "countdown cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for CountdownScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
