//! Resource lifecycle tests: validation, construction, reconfiguration.

use std::sync::Arc;

use doorbot::error::{ConfigError, Error};
use doorbot::{Doorbot, LoopState};
use serde_json::json;

use crate::mock_caps::{
    FastDelay, MockServo, MockVision, RecordingSink, TestDoorbot, attrs, deps, rig, rig_with,
    wait_until,
};

#[test]
fn validate_reports_implicit_dependencies() {
    let names = TestDoorbot::validate_config(&attrs(&["person"], true)).unwrap();
    assert_eq!(names, vec!["door-servo", "detector"]);
}

#[test]
fn missing_camera_name_is_rejected_before_any_loop() {
    let bad = json!({ "servo_name": "door-servo", "vision_name": "detector" });

    assert_eq!(
        TestDoorbot::validate_config(&bad),
        Err(ConfigError::MissingField("camera_name"))
    );

    let vision = Arc::new(MockVision::new());
    let servo = Arc::new(MockServo::new());
    let result = Doorbot::new(
        &bad,
        &deps(&vision, &servo),
        FastDelay,
        Arc::new(RecordingSink::default()),
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField("camera_name")))
    ));
    assert_eq!(vision.calls(), 0);
}

#[test]
fn unknown_dependency_is_a_config_error() {
    let vision = Arc::new(MockVision::new());
    let servo = Arc::new(MockServo::new());
    let mut attributes = attrs(&["person"], true);
    attributes["servo_name"] = json!("garage-servo");

    let result = Doorbot::new(
        &attributes,
        &deps(&vision, &servo),
        FastDelay,
        Arc::new(RecordingSink::default()),
    );

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::UnresolvedDependency { kind: "servo", .. }))
    ));
}

#[test]
fn auto_start_begins_polling_on_construction() {
    let r = rig_with(MockVision::new(), &attrs(&["person"], true));

    assert_eq!(r.doorbot.state(), LoopState::Running);
    assert!(wait_until(|| r.vision.calls() > 0));

    r.doorbot.close();
    assert_eq!(r.doorbot.state(), LoopState::Idle);
}

#[test]
fn auto_start_defaults_to_on() {
    let r = rig_with(
        MockVision::new(),
        &json!({
            "servo_name": "door-servo",
            "vision_name": "detector",
            "camera_name": "porch-cam",
        }),
    );

    assert_eq!(r.doorbot.state(), LoopState::Running);
    r.doorbot.close();
}

#[test]
fn reconfigure_swaps_access_list_under_a_running_loop() {
    let r = rig(MockVision::steady(&["cat"]), &["person"]);
    r.doorbot.supervisor().start().unwrap();
    assert!(wait_until(|| r.vision.calls() >= 3));
    assert!(r.servo.moves().is_empty());

    r.doorbot
        .reconfigure(&attrs(&["cat"], false), &deps(&r.vision, &r.servo))
        .unwrap();

    assert!(wait_until(|| r.servo.moves().len() >= 2));
    assert_eq!(r.doorbot.supervisor().spawned(), 1);
    r.doorbot.close();
}

#[test]
fn rejected_reconfigure_keeps_previous_bindings() {
    let r = rig(MockVision::new(), &["person"]);

    let err = r
        .doorbot
        .reconfigure(
            &json!({ "servo_name": "door-servo", "camera_name": "porch-cam" }),
            &deps(&r.vision, &r.servo),
        )
        .unwrap_err();

    assert_eq!(err, Error::Config(ConfigError::MissingField("vision_name")));
    let current = r.doorbot.supervisor().control().bindings().load();
    assert_eq!(current.camera_name, "porch-cam");
    assert!(current.access_list.contains("person"));
}

#[test]
fn reconfigure_with_auto_start_starts_an_idle_loop() {
    let r = rig(MockVision::new(), &["person"]);
    assert_eq!(r.doorbot.state(), LoopState::Idle);

    r.doorbot
        .reconfigure(&attrs(&["dog"], true), &deps(&r.vision, &r.servo))
        .unwrap();

    assert_eq!(r.doorbot.state(), LoopState::Running);
    r.doorbot.close();
}
