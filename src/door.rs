//! Door actuator: one open → hold → close cycle on the servo.
//!
//! ```text
//!  get_position ──▶ move_to(p0 + OPEN_OFFSET) ──▶ hold ──▶ move_to(CLOSED)
//! ```
//!
//! The open target is relative to wherever the servo currently sits,
//! while the close target is absolute.  The two only agree when the
//! servo starts at `DOOR_CLOSED_POSITION`.
//!
//! No retries.  The first failing step aborts the cycle and is returned
//! as an [`ActuationError`] naming that step.

use log::debug;

use crate::app::ports::{DelayPort, ServoPort};
use crate::config::{DOOR_CLOSED_POSITION, DOOR_HOLD, DOOR_OPEN_OFFSET};
use crate::error::ActuationError;

/// Servo targets of a completed cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorCycle {
    pub opened_to: f64,
    pub closed_to: f64,
}

/// Open the door, hold it, then close it.
pub async fn open_and_close(
    servo: &impl ServoPort,
    delay: &impl DelayPort,
) -> Result<DoorCycle, ActuationError> {
    let current = servo
        .get_position()
        .await
        .map_err(ActuationError::ReadPosition)?;

    let opened_to = current + DOOR_OPEN_OFFSET;
    debug!("Door: opening {} -> {}", current, opened_to);
    servo
        .move_to(opened_to)
        .await
        .map_err(|source| ActuationError::Open {
            target: opened_to,
            source,
        })?;

    delay.sleep(DOOR_HOLD).await;

    let closed_to = DOOR_CLOSED_POSITION;
    debug!("Door: closing -> {}", closed_to);
    servo
        .move_to(closed_to)
        .await
        .map_err(|source| ActuationError::Close {
            target: closed_to,
            source,
        })?;

    Ok(DoorCycle {
        opened_to,
        closed_to,
    })
}
