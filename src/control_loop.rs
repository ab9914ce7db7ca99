//! The polling engine.
//!
//! Each tick reads one [`Bindings`] snapshot, fetches detections, asks
//! the access policy for a match, cycles the door on a match and then
//! paces itself:
//!
//! ```text
//! Polling ──▶ Deciding ──┬──▶ Idle ───────┬──▶ Pacing ──▶ Polling
//!                        └──▶ Actuating ──┘
//! ```
//!
//! Detection and actuation failures are logged, emitted as events and
//! contained within the tick.  The loop's only exit is the cancellation
//! signal (checked at the top of every tick) or being dropped by the
//! supervisor at a suspension point.

use std::cell::RefCell;
use std::sync::Arc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future::yield_now;
use log::{debug, error, info, warn};

use crate::app::events::DoorEvent;
use crate::app::ports::{DelayPort, EventSink, ServoPort, VisionPort};
use crate::config::{AccessList, TICK_INTERVAL};
use crate::{door, policy};

/// Cooperative stop request shared between a supervisor and one worker.
pub type CancelSignal = Signal<CriticalSectionRawMutex, ()>;

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Everything a tick reads: capability handles, camera and access list.
/// Immutable once published.
pub struct Bindings<V, S> {
    pub vision: Arc<V>,
    pub servo: Arc<S>,
    pub camera_name: String,
    pub access_list: AccessList,
}

/// The current [`Bindings`], swapped as a whole on reconfiguration.
///
/// A tick holds its own `Arc` for its whole duration, so a concurrent
/// [`replace`](Self::replace) is only seen from the next tick on.
pub struct SharedBindings<V, S> {
    current: Mutex<CriticalSectionRawMutex, RefCell<Arc<Bindings<V, S>>>>,
}

impl<V: VisionPort, S: ServoPort> SharedBindings<V, S> {
    pub fn new(bindings: Bindings<V, S>) -> Self {
        Self {
            current: Mutex::new(RefCell::new(Arc::new(bindings))),
        }
    }

    /// Snapshot for one tick.
    pub fn load(&self) -> Arc<Bindings<V, S>> {
        self.current.lock(|cell| Arc::clone(&cell.borrow()))
    }

    /// Publish new bindings.  Returns the previous snapshot.
    pub fn replace(&self, next: Bindings<V, S>) -> Arc<Bindings<V, S>> {
        let next = Arc::new(next);
        self.current.lock(|cell| cell.replace(next))
    }
}

// ---------------------------------------------------------------------------
// Control loop
// ---------------------------------------------------------------------------

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing authorised was seen.  `fetch_failed` is set when the
    /// vision capability errored and the tick ran with no detections.
    NoMatch { fetch_failed: bool },
    /// The door was cycled for `class_name`.
    DoorCycled { class_name: String },
    /// `class_name` was authorised but the door sequence aborted.
    ActuationFailed { class_name: String },
}

pub struct ControlLoop<V, S, D> {
    bindings: Arc<SharedBindings<V, S>>,
    delay: D,
    sink: Arc<dyn EventSink>,
}

impl<V, S, D> ControlLoop<V, S, D>
where
    V: VisionPort,
    S: ServoPort,
    D: DelayPort,
{
    pub fn new(bindings: Arc<SharedBindings<V, S>>, delay: D, sink: Arc<dyn EventSink>) -> Self {
        Self {
            bindings,
            delay,
            sink,
        }
    }

    pub fn bindings(&self) -> &Arc<SharedBindings<V, S>> {
        &self.bindings
    }

    pub(crate) fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Run ticks until `cancel` is signalled.
    pub async fn run(&self, cancel: &CancelSignal) {
        let mut ticks: u64 = 0;

        while !cancel.signaled() {
            let outcome = self.tick().await;
            ticks += 1;
            debug!("Loop: tick {} -> {:?}", ticks, outcome);

            // Let cancellation and other tasks in even when every await
            // above completed immediately.
            yield_now().await;
        }

        info!("Loop: cancellation observed after {} ticks", ticks);
    }

    /// One poll → decide → act → pace cycle.
    pub async fn tick(&self) -> TickOutcome {
        let bindings = self.bindings.load();

        // 1. Polling
        let (detections, fetch_failed) =
            match bindings.vision.get_detections(&bindings.camera_name).await {
                Ok(detections) => (detections, false),
                Err(e) => {
                    warn!(
                        "Loop: detections from '{}' unavailable: {}",
                        bindings.camera_name, e
                    );
                    self.sink.emit(&DoorEvent::DetectionFailed(e));
                    (Vec::new(), true)
                }
            };

        // 2. Deciding
        let outcome = match policy::decide(&detections, &bindings.access_list) {
            None => TickOutcome::NoMatch { fetch_failed },

            // 3. Actuating
            Some(granted) => {
                info!("Access granted to {}", granted.class_name);
                self.sink.emit(&DoorEvent::AccessGranted {
                    class_name: granted.class_name.clone(),
                    confidence: granted.confidence,
                });

                match door::open_and_close(&*bindings.servo, &self.delay).await {
                    Ok(cycle) => {
                        self.sink.emit(&DoorEvent::DoorCycled {
                            opened_to: cycle.opened_to,
                            closed_to: cycle.closed_to,
                        });
                        TickOutcome::DoorCycled {
                            class_name: granted.class_name.clone(),
                        }
                    }
                    Err(e) => {
                        error!(
                            "Door actuation failed: {} (position indeterminate: {})",
                            e,
                            e.position_indeterminate()
                        );
                        self.sink.emit(&DoorEvent::ActuationFailed(e));
                        TickOutcome::ActuationFailed {
                            class_name: granted.class_name.clone(),
                        }
                    }
                }
            }
        };

        // 4. Pacing
        self.delay.sleep(TICK_INTERVAL).await;
        outcome
    }
}
