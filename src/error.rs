//! Unified error types for the doorbot resource.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! resource boundary has one error type to surface.  Only configuration
//! and supervisor errors reach it; capability and actuation errors are
//! contained within a single control-loop tick and reported through the
//! event sink.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Errors surfaced by construction, reconfiguration and lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Attributes are missing, malformed, or reference unknown dependencies.
    Config(ConfigError),
    /// The control-loop worker could not be managed.
    Supervisor(SupervisorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Supervisor(e) => write!(f, "supervisor: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required attribute is absent.
    MissingField(&'static str),
    /// The attribute map could not be decoded (wrong types, not an object).
    Malformed(String),
    /// A named dependency was not supplied by the host.
    UnresolvedDependency { kind: &'static str, name: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required attribute `{field}` is missing"),
            Self::Malformed(msg) => write!(f, "malformed attributes: {msg}"),
            Self::UnresolvedDependency { kind, name } => {
                write!(f, "{kind} dependency `{name}` not found")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Capability errors
// ---------------------------------------------------------------------------

/// Failure of a remote capability call (vision or servo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The call never reached the capability or the connection dropped.
    Transport(String),
    /// The capability answered with an error.
    Remote(String),
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Remote(msg) => write!(f, "remote error: {msg}"),
        }
    }
}

impl std::error::Error for CapabilityError {}

// ---------------------------------------------------------------------------
// Actuation errors
// ---------------------------------------------------------------------------

/// The door sequence aborted.  Each variant names the step that failed;
/// after `Open` or `Close` the physical door position is indeterminate.
#[derive(Debug, Clone, PartialEq)]
pub enum ActuationError {
    /// Reading the current servo position failed; nothing was moved.
    ReadPosition(CapabilityError),
    /// The open move failed.
    Open { target: f64, source: CapabilityError },
    /// The close move failed; the door may be left open.
    Close { target: f64, source: CapabilityError },
}

impl ActuationError {
    /// Whether the servo may have moved before the failure.
    pub fn position_indeterminate(&self) -> bool {
        !matches!(self, Self::ReadPosition(_))
    }
}

impl fmt::Display for ActuationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadPosition(e) => write!(f, "servo position read failed: {e}"),
            Self::Open { target, source } => {
                write!(f, "open move to {target} failed: {source}")
            }
            Self::Close { target, source } => {
                write!(f, "close move to {target} failed (door position unknown): {source}")
            }
        }
    }
}

impl std::error::Error for ActuationError {}

// ---------------------------------------------------------------------------
// Supervisor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorError {
    /// The OS refused to create the worker thread.
    SpawnFailed(String),
}

impl fmt::Display for SupervisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnFailed(msg) => write!(f, "worker spawn failed: {msg}"),
        }
    }
}

impl std::error::Error for SupervisorError {}

impl From<SupervisorError> for Error {
    fn from(e: SupervisorError) -> Self {
        Self::Supervisor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
