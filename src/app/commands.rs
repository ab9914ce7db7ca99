//! Inbound commands to the resource.
//!
//! The host delivers commands as a name → argument mapping; only the
//! names below are recognised.  Arguments are ignored.

/// Commands the [`CommandDispatcher`](crate::dispatch::CommandDispatcher)
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    /// Begin polling (idempotent).
    Start,
    /// Halt polling (idempotent).
    Stop,
}

impl DoorCommand {
    /// Parse a command name.  Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}
