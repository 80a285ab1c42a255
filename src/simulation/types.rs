//! Core types for the traffic light
//!
//! These are plain types shared by the channel and the cycling loop.

/// Lower bound of a cycle, in milliseconds
pub const CYCLE_MIN_MS: u64 = 4000;

/// Upper bound (exclusive) of a cycle, in milliseconds
pub const CYCLE_MAX_MS: u64 = 6000;

/// Step between durations when cycling in stepped mode
pub const CYCLE_STEP_MS: u64 = 1000;

/// Sleep between two elapsed-time checks of the cycling loop
pub const POLL_INTERVAL_MS: u64 = 1;

/// The phase of a traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TrafficLightPhase {
    /// Vehicles must wait
    #[default]
    Red = 0,
    /// Vehicles may cross
    Green = 1,
}

impl TrafficLightPhase {
    /// The phase that follows this one
    pub fn toggled(self) -> Self {
        match self {
            TrafficLightPhase::Red => TrafficLightPhase::Green,
            TrafficLightPhase::Green => TrafficLightPhase::Red,
        }
    }

    pub fn is_green(self) -> bool {
        self == TrafficLightPhase::Green
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        if value == TrafficLightPhase::Green as u8 {
            TrafficLightPhase::Green
        } else {
            TrafficLightPhase::Red
        }
    }
}

impl std::fmt::Display for TrafficLightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficLightPhase::Red => write!(f, "red"),
            TrafficLightPhase::Green => write!(f, "green"),
        }
    }
}
