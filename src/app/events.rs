//! Outbound application events.
//!
//! The control loop emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters decide where
//! they go; [`LogEventSink`](crate::adapters::log_sink::LogEventSink)
//! writes them to the log.

use crate::error::{ActuationError, CapabilityError};

/// Structured events emitted by the door-control core.
#[derive(Debug, Clone, PartialEq)]
pub enum DoorEvent {
    /// A worker began polling.
    LoopStarted,

    /// The worker observed cancellation and exited.
    LoopStopped,

    /// An authorised detection was seen this tick.
    AccessGranted { class_name: String, confidence: f64 },

    /// The door was opened and closed again.
    DoorCycled { opened_to: f64, closed_to: f64 },

    /// The vision capability failed; the tick ran with no detections.
    DetectionFailed(CapabilityError),

    /// The door sequence aborted part-way.
    ActuationFailed(ActuationError),
}
