//! Network Subsystem Module
//!
//! Reference-counted, process-wide networking subsystem. Unix targets have no
//! explicit startup step, but the count is still kept so startup and teardown
//! are observable and strictly ordered around the adapters that use them.

use lazy_static::lazy_static;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct SubsystemState {
    users: usize,
    generation: u64,
}

lazy_static! {
    static ref SUBSYSTEM: Mutex<SubsystemState> = Mutex::new(SubsystemState::default());
}

fn state() -> MutexGuard<'static, SubsystemState> {
    // The counter stays consistent even if a holder panicked
    SUBSYSTEM.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-wide networking subsystem
pub struct NetworkSubsystem;

impl NetworkSubsystem {
    /// Register one more user of the subsystem
    ///
    /// The first user starts the subsystem. The returned guard releases the
    /// registration when dropped.
    pub fn acquire() -> SubsystemGuard {
        let mut state = state();
        if state.users == 0 {
            state.generation += 1;
            info!(generation = state.generation, "network subsystem started");
        }
        state.users += 1;
        debug!(users = state.users, "network subsystem acquired");
        SubsystemGuard { _private: () }
    }

    /// Number of live guards
    pub fn active_users() -> usize {
        state().users
    }

    /// Number of times the subsystem has been started in this process
    pub fn generation() -> u64 {
        state().generation
    }
}

/// Registration of one subsystem user; releases it on drop
#[derive(Debug)]
pub struct SubsystemGuard {
    _private: (),
}

impl Drop for SubsystemGuard {
    fn drop(&mut self) {
        let mut state = state();
        state.users = state.users.saturating_sub(1);
        debug!(users = state.users, "network subsystem released");
        if state.users == 0 {
            info!(generation = state.generation, "network subsystem stopped");
        }
    }
}
