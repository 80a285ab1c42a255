//! Standalone traffic light module
//!
//! This module contains the phase channel and the traffic light that cycles
//! through its phases on a background thread. It has no knowledge of the
//! vehicles or intersections that wait on it.

mod channel;
mod cycle;
mod error;
mod traffic_light;
mod types;

// Re-export public types for external use
pub use channel::PhaseChannel;
pub use cycle::{CycleConfig, CycleMode, CycleTimer};
pub use error::TrafficLightError;
pub use traffic_light::TrafficLight;
pub use types::{TrafficLightPhase, CYCLE_MAX_MS, CYCLE_MIN_MS, CYCLE_STEP_MS, POLL_INTERVAL_MS};
