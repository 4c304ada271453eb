//! Countdown engine.
//!
//! - `CountdownScheduler`: owns the cancelable one-second ticker
//! - `CompletionCoordinator`: credits each finished session exactly once
//! - `TimerEngine`: ties the store, the ticker and the ledgers together

mod completion;
mod engine;
mod scheduler;

pub use completion::CompletionCoordinator;
pub use engine::{EngineChannels, TimerEngine, EVENT_CAPACITY};
pub use scheduler::{CountdownScheduler, TickFlow};
