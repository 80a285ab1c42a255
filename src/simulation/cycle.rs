//! Cycle duration configuration and generation
//!
//! Each phase lasts a random duration drawn from `[min, max)`. Two modes are
//! supported: a uniform draw over the whole range, and a stepped draw that
//! only yields `min`, `min + step`, ... (with the defaults: 4000 or 5000 ms).

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::time::Duration;

use super::error::TrafficLightError;
use super::types::{CYCLE_MAX_MS, CYCLE_MIN_MS, CYCLE_STEP_MS, POLL_INTERVAL_MS};

/// How cycle durations are drawn from the configured range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleMode {
    /// Any whole millisecond in `[min, max)`
    #[default]
    Uniform,
    /// `min + k * step` for a uniformly drawn `k` that stays below `max`
    Stepped { step: Duration },
}

/// Timing configuration for a traffic light
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleConfig {
    /// Shortest possible cycle
    pub min: Duration,
    /// Exclusive upper bound of a cycle
    pub max: Duration,
    pub mode: CycleMode,
    /// Sleep between two elapsed-time checks
    pub poll_interval: Duration,
    /// Seed for reproducible durations; `None` uses the thread RNG
    pub seed: Option<u64>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(CYCLE_MIN_MS),
            max: Duration::from_millis(CYCLE_MAX_MS),
            mode: CycleMode::Uniform,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            seed: None,
        }
    }
}

impl CycleConfig {
    /// Create a uniform configuration over `[min, max)`
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    /// The 4000 / 5000 ms quantization of the classic traffic light exercise
    pub fn reference() -> Self {
        Self::default().with_mode(CycleMode::Stepped {
            step: Duration::from_millis(CYCLE_STEP_MS),
        })
    }

    pub fn with_mode(mut self, mode: CycleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Check that the bounds describe a non-empty whole-millisecond range
    pub fn validate(&self) -> Result<(), TrafficLightError> {
        self.bounds_ms().map(|_| ())
    }

    /// The `(min, max, step)` bounds in milliseconds, as the timer draws them
    fn bounds_ms(&self) -> Result<(u64, u64, Option<u64>), TrafficLightError> {
        let min_ms = whole_millis(self.min, "minimum cycle")?;
        let max_ms = whole_millis(self.max, "maximum cycle")?;
        if min_ms >= max_ms {
            return Err(TrafficLightError::InvalidConfig(format!(
                "minimum cycle {:?} must be shorter than maximum {:?}",
                self.min, self.max
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(TrafficLightError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        let step_ms = match self.mode {
            CycleMode::Uniform => None,
            CycleMode::Stepped { step } => {
                let step_ms = whole_millis(step, "step")?;
                if step_ms == 0 || step_ms > max_ms - min_ms {
                    return Err(TrafficLightError::InvalidConfig(format!(
                        "step {:?} must be non-zero and fit within {:?}..{:?}",
                        step, self.min, self.max
                    )));
                }
                Some(step_ms)
            }
        };
        Ok((min_ms, max_ms, step_ms))
    }
}

/// Convert `duration` to milliseconds, rejecting fractions and overflow
fn whole_millis(duration: Duration, what: &str) -> Result<u64, TrafficLightError> {
    if duration.subsec_nanos() % 1_000_000 != 0 {
        return Err(TrafficLightError::InvalidConfig(format!(
            "{} {:?} must be a whole number of milliseconds",
            what, duration
        )));
    }
    u64::try_from(duration.as_millis()).map_err(|_| {
        TrafficLightError::InvalidConfig(format!("{} {:?} is too large", what, duration))
    })
}

/// Draws cycle durations according to a `CycleConfig`
#[derive(Debug)]
pub struct CycleTimer {
    min_ms: u64,
    max_ms: u64,
    step_ms: Option<u64>,
    /// Optional seeded RNG for reproducible cycles
    rng: Option<StdRng>,
}

impl CycleTimer {
    /// Build a timer from a validated configuration
    pub fn new(config: &CycleConfig) -> Result<Self, TrafficLightError> {
        let (min_ms, max_ms, step_ms) = config.bounds_ms()?;
        Ok(Self {
            min_ms,
            max_ms,
            step_ms,
            rng: config.seed.map(StdRng::seed_from_u64),
        })
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<u64>) -> u64 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Draw the duration of the next cycle
    pub fn next_duration(&mut self) -> Duration {
        let millis = match self.step_ms {
            Some(step) => {
                let steps = ((self.max_ms - self.min_ms) / step).max(1);
                self.min_ms + self.random_range(0..steps) * step
            }
            None => self.random_range(self.min_ms..self.max_ms),
        };
        Duration::from_millis(millis)
    }
}
