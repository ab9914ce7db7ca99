//! doorbot-sim: runs the door controller against simulated capabilities.
//!
//! ```text
//! doorbot-sim [ATTRIBUTES.json] [SECONDS]
//! ```
//!
//! Without an attribute file a porch setup admitting `person` and `dog`
//! is used.  Set `RUST_LOG=debug` to see every tick.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde_json::{Map, Value, json};

use doorbot::adapters::log_sink::LogEventSink;
use doorbot::adapters::sim::{SimServo, SimVision};
use doorbot::adapters::time::TimerDelay;
use doorbot::config::{DoorbotConfig, MODEL};
use doorbot::{Dependencies, Detection, Doorbot};

fn default_attributes() -> Value {
    json!({
        "servo_name": "door-servo",
        "vision_name": "detector",
        "camera_name": "porch-cam",
        "access_list": ["person", "dog"],
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let attrs = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading attributes from {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => default_attributes(),
    };
    let run_for = match args.next() {
        Some(secs) => Duration::from_secs(secs.parse().context("SECONDS must be an integer")?),
        None => Duration::from_secs(10),
    };

    let deps_names = Doorbot::<SimVision, SimServo, TimerDelay>::validate_config(&attrs)?;
    info!("{} depends on {:?}", MODEL, deps_names);
    let config = DoorbotConfig::from_attributes(&attrs)?.validate()?;

    let vision = Arc::new(
        SimVision::new(vec![
            vec![],
            vec![Detection::new("cat", 0.81)],
            vec![Detection::new("cat", 0.77), Detection::new("person", 0.93)],
            vec![],
        ])
        .failing_every(7),
    );
    let servo = Arc::new(SimServo::new(10.0));
    let deps = Dependencies::new()
        .with_vision(config.vision_name, vision)
        .with_servo(config.servo_name, Arc::clone(&servo));

    let doorbot = Doorbot::new(&attrs, &deps, TimerDelay::new(), Arc::new(LogEventSink::new()))?;
    let mut command = Map::new();
    command.insert("start".into(), Value::Null);
    let reply = doorbot.do_command(&command);
    info!("do_command -> {:?}", reply);

    std::thread::sleep(run_for);

    doorbot.close();
    info!("Stopped; servo resting at {}", servo.position());
    Ok(())
}
