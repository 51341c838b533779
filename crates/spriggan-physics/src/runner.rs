//! Shared engine handle and the background tick runner.
//!
//! [`EngineHandle`] wraps the engine in `Arc<Mutex<_>>` so caller threads,
//! force timers, and the tick loop all mutate through one lock, released by
//! RAII guard. A poisoned lock is recovered rather than propagated: the
//! engine's tables stay structurally valid even if a holder panicked
//! mid-update, and a stuck tick loop is worse than a stale frame.
//!
//! [`TickRunner`] owns the display and a thread that ticks the engine at the
//! configured rate until stopped or dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use spriggan_sprite::display::Display;
use spriggan_sprite::sprite::SpriteId;
use tracing::{debug, trace, warn};

use crate::engine::PhysicsEngine;
use crate::force::{ForceHandle, Vec2};
use crate::PhysicsError;

// ---------------------------------------------------------------------------
// EngineHandle
// ---------------------------------------------------------------------------

/// Cloneable, thread-safe handle to a shared [`PhysicsEngine`].
#[derive(Clone)]
pub struct EngineHandle {
    inner: Arc<Mutex<PhysicsEngine>>,
}

impl EngineHandle {
    /// Wrap an engine for shared access.
    pub fn new(engine: PhysicsEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock the engine. Recovers from a poisoned mutex.
    pub fn lock(&self) -> MutexGuard<'_, PhysicsEngine> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("engine lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Apply a force for a fixed duration, then remove it automatically.
    ///
    /// The sprite must be known; the removal timer runs on a detached
    /// thread and tolerates the force having been removed earlier by hand.
    pub fn add_force_for(
        &self,
        id: SpriteId,
        force: Vec2,
        duration: Duration,
    ) -> Result<ForceHandle, PhysicsError> {
        let handle = self.lock().add_force(id, force)?;
        let engine = self.clone();
        thread::spawn(move || {
            thread::sleep(duration);
            match engine.lock().remove_force(id, handle) {
                Ok(removed) => {
                    trace!(sprite = %id, ?handle, removed, "timed force expired")
                }
                Err(_) => trace!(sprite = %id, "timed force outlived its sprite"),
            }
        });
        Ok(handle)
    }
}

// ---------------------------------------------------------------------------
// TickRunner
// ---------------------------------------------------------------------------

/// Background thread ticking a shared engine at a fixed rate.
///
/// The runner owns the display for its lifetime; [`TickRunner::stop`] shuts
/// the loop down and hands the display back. Dropping the runner stops it
/// too, discarding the display.
pub struct TickRunner {
    engine: EngineHandle,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<Box<dyn Display + Send>>>,
}

impl TickRunner {
    /// Start ticking `engine` against `display` at the engine's configured
    /// `ticks_per_second`.
    pub fn start(engine: EngineHandle, mut display: Box<dyn Display + Send>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let interval = {
            let tps = engine.lock().config().ticks_per_second.max(1);
            Duration::from_secs_f64(1.0 / f64::from(tps))
        };
        debug!(?interval, "tick runner starting");
        let worker = {
            let engine = engine.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    let started = std::time::Instant::now();
                    engine.lock().tick(display.as_mut());
                    // Lock released before sleeping so callers get a turn.
                    if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                        thread::sleep(remaining);
                    }
                }
                display
            })
        };
        Self {
            engine,
            stop,
            worker: Some(worker),
        }
    }

    /// The shared engine handle.
    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// Whether the tick thread is still running.
    pub fn is_running(&self) -> bool {
        !self.stop.load(Ordering::Acquire) && self.worker.is_some()
    }

    /// Stop the tick loop and return the display.
    pub fn stop(mut self) -> Option<Box<dyn Display + Send>> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<Box<dyn Display + Send>> {
        self.stop.store(true, Ordering::Release);
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(display) => Some(display),
            Err(_) => {
                warn!("tick thread panicked during shutdown");
                None
            }
        }
    }
}

impl Drop for TickRunner {
    fn drop(&mut self) {
        let _ = self.shutdown();
        debug!("tick runner stopped");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
