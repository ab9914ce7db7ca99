//! Application core: the door-control domain, zero I/O.
//!
//! Capability calls (vision, servo), delays and event emission go
//! through the **port traits** in [`ports`], so the policy, actuator
//! sequence and control loop are testable without remote resources.

pub mod commands;
pub mod events;
pub mod ports;
