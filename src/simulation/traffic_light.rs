//! Traffic light that cycles through its phases on a background thread
//!
//! The light owns its current phase and a `PhaseChannel`. Once `simulate` is
//! called a worker thread toggles the phase whenever the drawn cycle duration
//! has elapsed and publishes every transition on the channel. Waiters observe
//! transitions, not the steady state: `wait_for_green` called while the light
//! is already green blocks until the next green transition.

use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::channel::PhaseChannel;
use super::cycle::{CycleConfig, CycleTimer};
use super::error::TrafficLightError;
use super::types::TrafficLightPhase;

/// State shared between the light and its cycling thread
#[derive(Debug)]
struct Shared {
    /// Current phase, written only by the cycling thread
    phase: AtomicU8,
    queue: PhaseChannel<TrafficLightPhase>,
    /// Checked by the cycling thread on every poll
    stop: AtomicBool,
}

impl Shared {
    fn current_phase(&self) -> TrafficLightPhase {
        TrafficLightPhase::from_u8(self.phase.load(Ordering::Acquire))
    }
}

/// A traffic light toggling between red and green on a randomized timer
#[derive(Debug)]
pub struct TrafficLight {
    shared: Arc<Shared>,
    config: CycleConfig,
    started: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficLight {
    fn new_internal(config: CycleConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                phase: AtomicU8::new(TrafficLightPhase::Red.as_u8()),
                queue: PhaseChannel::new(),
                stop: AtomicBool::new(false),
            }),
            config,
            started: AtomicBool::new(false),
            worker: Mutex::new(None),
        }
    }

    /// Create a red light with the default 4-6 second cycle
    pub fn new() -> Self {
        Self::new_internal(CycleConfig::default())
    }

    /// Create a red light with custom cycle timing
    pub fn with_config(config: CycleConfig) -> Result<Self, TrafficLightError> {
        config.validate()?;
        Ok(Self::new_internal(config))
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Start cycling through the phases on a background thread.
    ///
    /// Returns immediately. Only the first call starts a thread; later calls
    /// fail with `AlreadyRunning`, or `Stopped` once the light was stopped.
    pub fn simulate(&self) -> Result<(), TrafficLightError> {
        if self.shared.stop.load(Ordering::Acquire) {
            return Err(TrafficLightError::Stopped);
        }
        let timer = CycleTimer::new(&self.config)?;

        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Traffic light is already cycling, ignoring duplicate start");
            return Err(TrafficLightError::AlreadyRunning);
        }

        let shared = Arc::clone(&self.shared);
        let poll_interval = self.config.poll_interval;
        let spawned = thread::Builder::new()
            .name("traffic-light".to_string())
            .spawn(move || cycle_through_phases(&shared, timer, poll_interval));

        match spawned {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                info!(
                    "Traffic light started ({:?}..{:?}, {:?})",
                    self.config.min, self.config.max, self.config.mode
                );
                Ok(())
            }
            Err(e) => {
                self.started.store(false, Ordering::Release);
                Err(TrafficLightError::Spawn(e))
            }
        }
    }

    /// Snapshot of the current phase. Never blocks.
    pub fn current_phase(&self) -> TrafficLightPhase {
        self.shared.current_phase()
    }

    /// Block until the light next turns green
    pub fn wait_for_green(&self) -> Result<(), TrafficLightError> {
        self.wait_for(TrafficLightPhase::Green)
    }

    /// Block until a transition to `target` is published.
    ///
    /// Every other phase received in the meantime is discarded.
    pub fn wait_for(&self, target: TrafficLightPhase) -> Result<(), TrafficLightError> {
        loop {
            if self.shared.queue.receive()? == target {
                return Ok(());
            }
        }
    }

    /// Like `wait_for`, but returns `Ok(false)` if `timeout` passes first.
    ///
    /// A pending phase is always checked, even with a zero timeout. A timeout
    /// too large to represent as a deadline waits without one.
    pub fn wait_for_timeout(
        &self,
        target: TrafficLightPhase,
        timeout: Duration,
    ) -> Result<bool, TrafficLightError> {
        if self.shared.queue.try_receive() == Some(target) {
            return Ok(true);
        }
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for(target).map(|()| true);
        };
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }
            match self.shared.queue.receive_timeout(remaining)? {
                Some(phase) if phase == target => return Ok(true),
                Some(_) => continue,
                None => return Ok(false),
            }
        }
    }

    /// Block until the next published transition and return its phase
    pub fn next_transition(&self) -> Result<TrafficLightPhase, TrafficLightError> {
        self.shared.queue.receive()
    }

    /// Whether the cycling thread has been started and not yet stopped
    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire) && !self.shared.stop.load(Ordering::Acquire)
    }

    /// Stop the cycling thread and wake every waiter with `Stopped`.
    ///
    /// Joins the thread before returning. Calling it again is a no-op.
    pub fn stop(&self) {
        if !self.shared.stop.swap(true, Ordering::AcqRel) {
            info!("Stopping traffic light in phase {}", self.current_phase());
        }
        self.shared.queue.close();

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Traffic light cycling thread panicked");
            }
        }
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The cycling loop run by the background thread.
///
/// Polls the elapsed time every `poll_interval`; once it exceeds the drawn
/// duration the phase is toggled, stored, then published.
fn cycle_through_phases(shared: &Shared, mut timer: CycleTimer, poll_interval: Duration) {
    let mut cycle_duration = timer.next_duration();
    let mut last_switch = Instant::now();

    while !shared.stop.load(Ordering::Acquire) {
        thread::sleep(poll_interval);

        if last_switch.elapsed() > cycle_duration {
            let next = shared.current_phase().toggled();
            shared.phase.store(next.as_u8(), Ordering::Release);
            shared.queue.send(next);

            last_switch = Instant::now();
            cycle_duration = timer.next_duration();
            debug!("Traffic light switched to {} for {:?}", next, cycle_duration);
        }
    }
}
