//! Traffic Light Library
//!
//! A threaded traffic light that cycles between red and green and lets any
//! number of threads block until the next green phase.

pub mod simulation;
