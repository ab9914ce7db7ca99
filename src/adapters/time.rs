//! Timer-backed delay adapter.
//!
//! Implements [`DelayPort`] with `async_io_mini::Timer`, which parks the
//! awaiting task on the reactor instead of blocking the worker thread, so
//! a pending stop request can still drop the task mid-sleep.

use core::time::Duration;

use crate::app::ports::DelayPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct TimerDelay;

impl TimerDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayPort for TimerDelay {
    async fn sleep(&self, duration: Duration) {
        async_io_mini::Timer::after(duration).await;
    }
}
