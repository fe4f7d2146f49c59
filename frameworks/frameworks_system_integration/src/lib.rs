//! Frameworks Layer: System Integration
//!
//! Owns the process-wide networking subsystem. Every transport adapter holds
//! a [`SubsystemGuard`] for its whole lifetime; the subsystem is started by
//! the first guard and torn down when the last one is dropped.

pub mod subsystem;

pub use subsystem::{NetworkSubsystem, SubsystemGuard};
