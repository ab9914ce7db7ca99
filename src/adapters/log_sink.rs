//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing door events through the `log`
//! facade.  Actuation failures go out at `error` level and say the door
//! position is unknown, so they are never mistaken for a completed cycle.

use log::{error, info, warn};

use crate::app::events::DoorEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`DoorEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&self, event: &DoorEvent) {
        match event {
            DoorEvent::LoopStarted => info!("LOOP  | polling started"),
            DoorEvent::LoopStopped => info!("LOOP  | polling stopped"),
            DoorEvent::AccessGranted {
                class_name,
                confidence,
            } => {
                info!("ACCESS| granted to {} (confidence {:.2})", class_name, confidence);
            }
            DoorEvent::DoorCycled {
                opened_to,
                closed_to,
            } => {
                info!("DOOR  | opened to {}, closed to {}", opened_to, closed_to);
            }
            DoorEvent::DetectionFailed(e) => warn!("VISION| {}", e),
            DoorEvent::ActuationFailed(e) => {
                if e.position_indeterminate() {
                    error!("DOOR  | {} -- door position unknown", e);
                } else {
                    error!("DOOR  | {}", e);
                }
            }
        }
    }
}
