//! Lifecycle tests: start/stop idempotency, cancellation, fault tolerance.

use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

use doorbot::LoopState;
use doorbot::app::events::DoorEvent;

use crate::mock_caps::{MockVision, rig, wait_until};

#[test]
fn repeated_start_keeps_a_single_worker() {
    let r = rig(MockVision::new(), &["person"]);
    let supervisor = r.doorbot.supervisor();

    supervisor.start().unwrap();
    supervisor.start().unwrap();

    assert_eq!(supervisor.state(), LoopState::Running);
    assert_eq!(supervisor.spawned(), 1);
    assert!(wait_until(|| r.vision.calls() >= 10));
    assert_eq!(r.vision.max_in_flight(), 1, "two workers polled concurrently");

    r.doorbot.close();
}

#[test]
fn concurrent_starts_spawn_one_worker() {
    const CALLERS: usize = 8;
    let r = rig(MockVision::new(), &["person"]);
    let supervisor = r.doorbot.supervisor();
    let barrier = Barrier::new(CALLERS);

    thread::scope(|s| {
        for _ in 0..CALLERS {
            s.spawn(|| {
                barrier.wait();
                supervisor.start().unwrap();
            });
        }
    });

    assert_eq!(supervisor.state(), LoopState::Running);
    assert_eq!(supervisor.spawned(), 1);
    assert!(wait_until(|| r.vision.calls() >= 10));
    assert_eq!(r.vision.max_in_flight(), 1, "two workers polled concurrently");

    r.doorbot.close();
}

#[test]
fn racing_start_and_stop_leave_no_orphaned_worker() {
    const ROUNDS: usize = 20;
    let r = rig(MockVision::new(), &["person"]);
    let supervisor = r.doorbot.supervisor();
    let barrier = Barrier::new(2);

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..ROUNDS {
                barrier.wait();
                supervisor.start().unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..ROUNDS {
                barrier.wait();
                supervisor.stop();
            }
        });
    });

    // Whichever call won the last round, at most one worker is live.
    let spawned = supervisor.spawned();
    assert!((1..=ROUNDS as u64).contains(&spawned));
    assert_eq!(r.vision.max_in_flight(), 1, "two workers polled concurrently");

    r.doorbot.close();
    assert_eq!(supervisor.state(), LoopState::Idle);

    // Every worker ever spawned has been joined.
    let stopped = r.sink.count(|e| *e == DoorEvent::LoopStopped);
    assert_eq!(stopped as u64, spawned);
    let after_close = r.vision.calls();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(r.vision.calls(), after_close);
}

#[test]
fn immediate_stop_still_pairs_loop_events() {
    let r = rig(MockVision::new(), &["person"]);
    let supervisor = r.doorbot.supervisor();

    for _ in 0..10 {
        supervisor.start().unwrap();
        supervisor.stop();
    }

    assert_eq!(supervisor.spawned(), 10);
    assert_eq!(r.sink.count(|e| *e == DoorEvent::LoopStarted), 10);
    assert_eq!(r.sink.count(|e| *e == DoorEvent::LoopStopped), 10);
}

#[test]
fn stop_while_idle_is_a_no_op() {
    let r = rig(MockVision::new(), &["person"]);

    r.doorbot.supervisor().stop();
    r.doorbot.supervisor().stop();

    assert_eq!(r.doorbot.state(), LoopState::Idle);
    assert_eq!(r.doorbot.supervisor().spawned(), 0);
    assert_eq!(r.vision.calls(), 0);
}

#[test]
fn start_stop_start_resumes_polling() {
    let r = rig(MockVision::new(), &["person"]);
    let supervisor = r.doorbot.supervisor();

    assert_eq!(supervisor.state(), LoopState::Idle);
    supervisor.start().unwrap();
    assert_eq!(supervisor.state(), LoopState::Running);
    assert!(wait_until(|| r.vision.calls() > 0));

    supervisor.stop();
    assert_eq!(supervisor.state(), LoopState::Idle);

    // stop() joined the worker, so nothing polls any more.
    let after_stop = r.vision.calls();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(r.vision.calls(), after_stop);

    supervisor.start().unwrap();
    assert_eq!(supervisor.state(), LoopState::Running);
    assert!(wait_until(|| r.vision.calls() > after_stop));
    assert_eq!(supervisor.spawned(), 2);

    r.doorbot.close();
    assert_eq!(
        r.sink.count(|e| *e == DoorEvent::LoopStarted),
        r.sink.count(|e| *e == DoorEvent::LoopStopped)
    );
}

#[test]
fn stop_interrupts_a_hung_capability_call() {
    let r = rig(MockVision::hanging(), &["person"]);
    let supervisor = r.doorbot.supervisor();

    supervisor.start().unwrap();
    assert!(wait_until(|| r.vision.calls() == 1));

    let started = Instant::now();
    supervisor.stop();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(supervisor.state(), LoopState::Idle);
    assert_eq!(r.sink.count(|e| *e == DoorEvent::LoopStopped), 1);
}

#[test]
fn detection_failures_never_stop_the_loop() {
    let r = rig(MockVision::failing(), &["person"]);

    r.doorbot.supervisor().start().unwrap();
    assert!(wait_until(|| r.vision.calls() >= 5));

    assert_eq!(r.doorbot.state(), LoopState::Running);
    assert!(r.servo.moves().is_empty());
    assert!(r.sink.count(|e| matches!(e, DoorEvent::DetectionFailed(_))) >= 4);

    r.doorbot.close();
}

#[test]
fn authorised_detection_cycles_the_door() {
    let r = rig(MockVision::steady(&["person"]), &["person"]);

    r.doorbot.supervisor().start().unwrap();
    assert!(wait_until(|| r.servo.moves().len() >= 2));
    r.doorbot.close();

    let moves = r.servo.moves();
    assert_eq!(&moves[..2], &[70.0, 10.0]);
    assert!(r.sink.count(|e| matches!(e, DoorEvent::DoorCycled { .. })) >= 1);
}
