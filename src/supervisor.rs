//! Control-loop lifecycle: start, stop, teardown.
//!
//! ```text
//!            start()                         stop() / close()
//!   Idle ───────────────▶ Running ─────────────────────────────▶ Idle
//!     ▲   spawn worker,     │      signal cancel, join worker
//!     │   fresh signal      │
//!     └──── start() on Running is a no-op ───┘
//! ```
//!
//! Each running supervisor owns exactly one worker: a dedicated thread
//! that drives the [`ControlLoop`] on an `edge_executor::LocalExecutor`.
//! The loop task is raced against the cancellation signal, so a stop
//! request drops the task at whatever suspension point it is parked on,
//! including a remote call that never answers.  The loop also checks the
//! same signal at the top of every tick.
//!
//! All lifecycle transitions happen under one lock, so two concurrent
//! `start()` calls cannot both spawn.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use futures_lite::future;
use log::{info, warn};

use crate::app::events::DoorEvent;
use crate::app::ports::{DelayPort, ServoPort, VisionPort};
use crate::control_loop::{CancelSignal, ControlLoop};
use crate::error::SupervisorError;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

struct Worker {
    cancel: Arc<CancelSignal>,
    handle: JoinHandle<()>,
}

enum Lifecycle {
    Idle,
    Running(Worker),
}

pub struct Supervisor<V, S, D> {
    control: Arc<ControlLoop<V, S, D>>,
    lifecycle: Mutex<Lifecycle>,
    spawned: AtomicU64,
}

impl<V, S, D> Supervisor<V, S, D>
where
    V: VisionPort + 'static,
    S: ServoPort + 'static,
    D: DelayPort + 'static,
{
    pub fn new(control: ControlLoop<V, S, D>) -> Self {
        Self {
            control: Arc::new(control),
            lifecycle: Mutex::new(Lifecycle::Idle),
            spawned: AtomicU64::new(0),
        }
    }

    pub fn control(&self) -> &ControlLoop<V, S, D> {
        &self.control
    }

    /// Spawn the worker unless one is already running.
    pub fn start(&self) -> Result<(), SupervisorError> {
        let mut lifecycle = self.lock();

        if let Lifecycle::Running(worker) = &*lifecycle {
            if !worker.handle.is_finished() {
                return Ok(());
            }
            warn!("Supervisor: previous worker exited on its own, restarting");
        }
        // Reap a worker that died without being stopped.
        if let Lifecycle::Running(worker) = std::mem::replace(&mut *lifecycle, Lifecycle::Idle) {
            reap(worker.handle);
        }

        let cancel = Arc::new(CancelSignal::new());
        let control = Arc::clone(&self.control);
        let worker_cancel = Arc::clone(&cancel);
        let handle = thread::Builder::new()
            .name("doorbot-loop".into())
            .spawn(move || run_worker(&control, &worker_cancel))
            .map_err(|e| SupervisorError::SpawnFailed(e.to_string()))?;

        let generation = self.spawned.fetch_add(1, Ordering::Relaxed) + 1;
        info!("Supervisor: worker #{} started", generation);
        *lifecycle = Lifecycle::Running(Worker { cancel, handle });
        Ok(())
    }

    /// Cancel the worker and wait for it to exit.  No-op when idle.
    pub fn stop(&self) {
        let mut lifecycle = self.lock();
        let Lifecycle::Running(worker) = std::mem::replace(&mut *lifecycle, Lifecycle::Idle) else {
            return;
        };

        worker.cancel.signal(());
        reap(worker.handle);
        info!("Supervisor: worker stopped");
    }

    /// Teardown when the owning resource goes away.
    pub fn close(&self) {
        self.stop();
    }

    pub fn state(&self) -> LoopState {
        match &*self.lock() {
            Lifecycle::Running(worker) if !worker.handle.is_finished() => LoopState::Running,
            _ => LoopState::Idle,
        }
    }

    /// Workers spawned over this supervisor's life.
    pub fn spawned(&self) -> u64 {
        self.spawned.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V, S, D> Drop for Supervisor<V, S, D> {
    fn drop(&mut self) {
        let lifecycle = self
            .lifecycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Lifecycle::Running(worker) = lifecycle {
            warn!("Supervisor dropped without close(); signalling worker");
            worker.cancel.signal(());
        }
    }
}

fn reap(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("Supervisor: worker panicked");
    }
}

/// Worker thread body.  Returns once `cancel` fires.
///
/// `LoopStarted` and `LoopStopped` bracket the worker, not the loop task,
/// so they pair up even when a stop lands before the task is first polled.
fn run_worker<V, S, D>(control: &ControlLoop<V, S, D>, cancel: &CancelSignal)
where
    V: VisionPort,
    S: ServoPort,
    D: DelayPort,
{
    control.sink().emit(&DoorEvent::LoopStarted);

    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    let task = executor.spawn(control.run(cancel));

    // Whichever finishes first wins; dropping `task` cancels the loop at
    // its current await point.
    future::block_on(executor.run(future::or(task, cancel.wait())));

    control.sink().emit(&DoorEvent::LoopStopped);
}
