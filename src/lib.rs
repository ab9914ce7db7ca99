//! Doorbot: vision-gated door controller.
//!
//! Polls a vision capability for detections, grants access to the first
//! detection whose class is on the access list, and cycles a servo to
//! open and re-close the door.  Exposed to a host runtime as a resource
//! with `validate_config` / `new` / `reconfigure` / `do_command` / `close`.
//!
//! ```text
//!  do_command ─▶ CommandDispatcher ─▶ Supervisor ─▶ ControlLoop (worker)
//!                                                     │
//!                            VisionPort ◀─────────────┤ detections
//!                            policy::decide ◀─────────┤
//!                            door::open_and_close ────┴─▶ ServoPort
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control_loop;
pub mod dispatch;
pub mod door;
pub mod error;
pub mod policy;
pub mod resource;
pub mod supervisor;

pub use app::ports::{BoundingBox, Detection};
pub use error::{Error, Result};
pub use resource::{Dependencies, Doorbot};
pub use supervisor::LoopState;
