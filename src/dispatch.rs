//! Command dispatch: maps the host's `do_command` payload onto the
//! supervisor.
//!
//! Every key is handled on its own and gets its own boolean in the
//! reply.  Unknown names are reported as `false`, never as errors.
//! Keys are processed in map order, one at a time; each command's
//! supervisor call has returned before the next key is looked at.

use std::collections::BTreeMap;

use log::{debug, error};
use serde_json::{Map, Value};

use crate::app::commands::DoorCommand;
use crate::app::ports::{DelayPort, ServoPort, VisionPort};
use crate::supervisor::Supervisor;

pub struct CommandDispatcher<'a, V, S, D> {
    supervisor: &'a Supervisor<V, S, D>,
}

impl<'a, V, S, D> CommandDispatcher<'a, V, S, D>
where
    V: VisionPort + 'static,
    S: ServoPort + 'static,
    D: DelayPort + 'static,
{
    pub fn new(supervisor: &'a Supervisor<V, S, D>) -> Self {
        Self { supervisor }
    }

    pub fn dispatch(&self, commands: &Map<String, Value>) -> BTreeMap<String, bool> {
        commands
            .keys()
            .map(|name| (name.clone(), self.apply(name)))
            .collect()
    }

    fn apply(&self, name: &str) -> bool {
        match DoorCommand::from_name(name) {
            Some(command) => self.execute(command),
            None => {
                debug!("Command '{}' not supported", name);
                false
            }
        }
    }

    fn execute(&self, command: DoorCommand) -> bool {
        let accepted = match command {
            DoorCommand::Start => match self.supervisor.start() {
                Ok(()) => true,
                Err(e) => {
                    error!("Command '{}' failed: {}", command.name(), e);
                    false
                }
            },
            DoorCommand::Stop => {
                self.supervisor.stop();
                true
            }
        };
        debug!("Command '{}' -> {}", command.name(), accepted);
        accepted
    }
}
