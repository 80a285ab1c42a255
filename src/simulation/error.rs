//! Error types for the traffic light

use thiserror::Error;

/// Errors returned by the traffic light and its phase channel
#[derive(Debug, Error)]
pub enum TrafficLightError {
    #[error("traffic light is already running")]
    AlreadyRunning,
    #[error("traffic light has been stopped")]
    Stopped,
    #[error("invalid cycle configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to spawn cycling thread: {0}")]
    Spawn(#[from] std::io::Error),
}
