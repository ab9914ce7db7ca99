//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements             | Connects to                 |
//! |------------|------------------------|-----------------------------|
//! | `log_sink` | EventSink              | `log` facade                |
//! | `time`     | DelayPort              | async-io-mini reactor timer |
//! | `sim`      | VisionPort, ServoPort  | in-memory simulation        |

pub mod log_sink;
pub mod sim;
pub mod time;
