//! Simulated capabilities for host runs.
//!
//! [`SimVision`] replays a fixed rotation of frames; [`SimServo`] keeps
//! its position in memory and acknowledges every move after a short
//! travel delay.  Used by `doorbot-sim` in place of remote resources.

use core::cell::Cell;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::app::ports::{Detection, ServoPort, VisionPort};
use crate::error::CapabilityError;

// ── Vision ────────────────────────────────────────────────────

/// Vision capability that cycles through `frames`, one per call.
pub struct SimVision {
    frames: Vec<Vec<Detection>>,
    next: AtomicUsize,
    /// Every `fail_every`-th call errors instead (0 = never).
    fail_every: usize,
}

impl SimVision {
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self {
            frames,
            next: AtomicUsize::new(0),
            fail_every: 0,
        }
    }

    #[must_use]
    pub fn failing_every(mut self, n: usize) -> Self {
        self.fail_every = n;
        self
    }
}

impl VisionPort for SimVision {
    async fn get_detections(&self, camera_name: &str) -> Result<Vec<Detection>, CapabilityError> {
        let call = self.next.fetch_add(1, Ordering::Relaxed);
        if self.fail_every > 0 && (call + 1) % self.fail_every == 0 {
            return Err(CapabilityError::Transport(format!(
                "camera '{camera_name}' timed out"
            )));
        }
        if self.frames.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.frames[call % self.frames.len()].clone())
    }
}

// ── Servo ─────────────────────────────────────────────────────

/// Servo capability with an in-memory position.
pub struct SimServo {
    position: Mutex<CriticalSectionRawMutex, Cell<f64>>,
    travel: Duration,
}

impl SimServo {
    pub fn new(initial: f64) -> Self {
        Self {
            position: Mutex::new(Cell::new(initial)),
            travel: Duration::from_millis(200),
        }
    }

    pub fn position(&self) -> f64 {
        self.position.lock(Cell::get)
    }
}

impl ServoPort for SimServo {
    async fn get_position(&self) -> Result<f64, CapabilityError> {
        Ok(self.position())
    }

    async fn move_to(&self, target: f64) -> Result<(), CapabilityError> {
        async_io_mini::Timer::after(self.travel).await;
        self.position.lock(|p| p.set(target));
        Ok(())
    }
}
