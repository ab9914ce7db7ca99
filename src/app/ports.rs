//! Port traits: the hexagonal boundary between door logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! The vision and servo ports front remote capabilities; every call may
//! suspend for as long as the remote side takes.  No timeout is applied
//! here.  The control loop consumes the ports via generics, so the domain
//! never names a transport.
//!
//! Handles are shared between the caller's context and the worker thread,
//! hence the `Send + Sync` bounds.  The futures the methods return are
//! polled on the worker thread only and carry no `Send` requirement.

use core::future::Future;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use super::events::DoorEvent;
use crate::error::CapabilityError;

// ───────────────────────────────────────────────────────────────
// Vision port (remote capability → domain)
// ───────────────────────────────────────────────────────────────

/// Axis-aligned box in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
}

/// One recognised object.  Only `class_name` drives decisions; the rest
/// is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    pub confidence: f64,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

impl Detection {
    pub fn new(class_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            class_name: class_name.into(),
            confidence,
            bounding_box: None,
        }
    }
}

/// Read-side port: object detections for a camera.
pub trait VisionPort: Send + Sync {
    /// Detections for the current frame of `camera_name`, in the order the
    /// service reports them.
    fn get_detections(
        &self,
        camera_name: &str,
    ) -> impl Future<Output = Result<Vec<Detection>, CapabilityError>>;
}

// ───────────────────────────────────────────────────────────────
// Servo port (domain → remote capability)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the door servo.  Positions are in the servo's native units.
pub trait ServoPort: Send + Sync {
    fn get_position(&self) -> impl Future<Output = Result<f64, CapabilityError>>;

    /// Move to an absolute position; resolves once the servo acknowledges.
    fn move_to(&self, target: f64) -> impl Future<Output = Result<(), CapabilityError>>;
}

// ───────────────────────────────────────────────────────────────
// Delay port (domain → timer)
// ───────────────────────────────────────────────────────────────

/// Suspends the caller for a duration.  Both the door hold and the loop
/// pacing go through here.
pub trait DelayPort: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`DoorEvent`]s through this port.
///
/// Called from the worker thread, so implementations synchronise
/// internally.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &DoorEvent);
}
