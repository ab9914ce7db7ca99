//! The doorbot resource as the host runtime sees it.
//!
//! The host calls [`Doorbot::validate_config`] before construction,
//! [`Doorbot::new`] once, [`Doorbot::reconfigure`] whenever attributes
//! or dependencies change, [`Doorbot::do_command`] for control and
//! [`Doorbot::close`] on teardown.
//!
//! Reconfiguration resolves everything up front and only then publishes
//! the new bindings in one swap, so a rejected configuration leaves the
//! running loop untouched.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::info;
use serde_json::{Map, Value};

use crate::app::ports::{DelayPort, EventSink, ServoPort, VisionPort};
use crate::config::{DoorbotConfig, MODEL, ValidatedConfig};
use crate::control_loop::{Bindings, ControlLoop, SharedBindings};
use crate::dispatch::CommandDispatcher;
use crate::error::{ConfigError, Result};
use crate::supervisor::{LoopState, Supervisor};

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// Capability handles the host resolved for this resource, by name.
pub struct Dependencies<V, S> {
    vision: HashMap<String, Arc<V>>,
    servos: HashMap<String, Arc<S>>,
}

impl<V, S> Default for Dependencies<V, S> {
    fn default() -> Self {
        Self {
            vision: HashMap::new(),
            servos: HashMap::new(),
        }
    }
}

impl<V, S> Dependencies<V, S> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_vision(mut self, name: impl Into<String>, vision: Arc<V>) -> Self {
        self.vision.insert(name.into(), vision);
        self
    }

    #[must_use]
    pub fn with_servo(mut self, name: impl Into<String>, servo: Arc<S>) -> Self {
        self.servos.insert(name.into(), servo);
        self
    }

    fn vision(&self, name: &str) -> core::result::Result<Arc<V>, ConfigError> {
        self.vision
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnresolvedDependency {
                kind: "vision",
                name: name.to_string(),
            })
    }

    fn servo(&self, name: &str) -> core::result::Result<Arc<S>, ConfigError> {
        self.servos
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnresolvedDependency {
                kind: "servo",
                name: name.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Doorbot
// ---------------------------------------------------------------------------

pub struct Doorbot<V, S, D> {
    supervisor: Supervisor<V, S, D>,
}

impl<V, S, D> Doorbot<V, S, D>
where
    V: VisionPort + 'static,
    S: ServoPort + 'static,
    D: DelayPort + 'static,
{
    /// Check attributes and report the resources this one depends on.
    pub fn validate_config(attrs: &Value) -> core::result::Result<Vec<String>, ConfigError> {
        let config = DoorbotConfig::from_attributes(attrs)?.validate()?;
        Ok(config.implicit_dependencies())
    }

    /// Build the resource.  Starts polling when `auto_start` is set.
    pub fn new(
        attrs: &Value,
        deps: &Dependencies<V, S>,
        delay: D,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let config = DoorbotConfig::from_attributes(attrs)?.validate()?;
        let bindings = Arc::new(SharedBindings::new(bind(&config, deps)?));
        let supervisor = Supervisor::new(ControlLoop::new(bindings, delay, sink));

        info!(
            "{}: watching '{}' for {} authorised classes",
            MODEL,
            config.camera_name,
            config.access_list.len()
        );

        let doorbot = Self { supervisor };
        if config.auto_start {
            doorbot.supervisor.start()?;
        }
        Ok(doorbot)
    }

    /// Apply new attributes and dependencies.
    ///
    /// Configuration and dependency errors leave the current bindings in
    /// place.  A worker spawn failure under `auto_start` is reported after
    /// the new bindings are already live.
    pub fn reconfigure(&self, attrs: &Value, deps: &Dependencies<V, S>) -> Result<()> {
        let config = DoorbotConfig::from_attributes(attrs)?.validate()?;
        let bindings = bind(&config, deps)?;

        self.supervisor.control().bindings().replace(bindings);
        info!(
            "{}: reconfigured, camera '{}', access list [{}]",
            MODEL,
            config.camera_name,
            config.access_list.iter().collect::<Vec<_>>().join(", ")
        );

        if config.auto_start {
            self.supervisor.start()?;
        }
        Ok(())
    }

    pub fn do_command(&self, commands: &Map<String, Value>) -> BTreeMap<String, bool> {
        CommandDispatcher::new(&self.supervisor).dispatch(commands)
    }

    /// Stop polling and release the worker.
    pub fn close(&self) {
        self.supervisor.close();
    }

    pub fn state(&self) -> LoopState {
        self.supervisor.state()
    }

    pub fn supervisor(&self) -> &Supervisor<V, S, D> {
        &self.supervisor
    }
}

fn bind<V, S>(
    config: &ValidatedConfig,
    deps: &Dependencies<V, S>,
) -> core::result::Result<Bindings<V, S>, ConfigError> {
    Ok(Bindings {
        vision: deps.vision(&config.vision_name)?,
        servo: deps.servo(&config.servo_name)?,
        camera_name: config.camera_name.clone(),
        access_list: config.access_list.clone(),
    })
}
