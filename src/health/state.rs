//! Dependency health state.
//!
//! # States
//! - Unknown: no probe has completed yet
//! - Healthy: last probe succeeded
//! - Unhealthy: last probe failed
//!
//! # State Transitions
//! ```text
//! Unknown → Healthy | Unhealthy: first probe
//! Healthy ←→ Unhealthy: any later probe (last write wins)
//! ```
//!
//! # Design Decisions
//! - No hysteresis: one probe decides, the interval is long
//! - State changes logged for observability

use std::sync::atomic::{AtomicU8, Ordering};

/// Tri-state health.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

impl From<Option<bool>> for HealthState {
    fn from(val: Option<bool>) -> Self {
        match val {
            Some(true) => HealthState::Healthy,
            Some(false) => HealthState::Unhealthy,
            None => HealthState::Unknown,
        }
    }
}

impl From<HealthState> for Option<bool> {
    fn from(state: HealthState) -> Self {
        match state {
            HealthState::Healthy => Some(true),
            HealthState::Unhealthy => Some(false),
            HealthState::Unknown => None,
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HealthState::Unknown => "unknown",
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
        };
        f.write_str(s)
    }
}

/// Lock-free cell holding a [`HealthState`].
#[derive(Debug)]
pub struct AtomicHealthState(AtomicU8);

impl AtomicHealthState {
    pub fn new(state: HealthState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> HealthState {
        self.0.load(Ordering::Relaxed).into()
    }

    /// Store `state` and return the previous one.
    pub fn swap(&self, state: HealthState) -> HealthState {
        self.0.swap(state as u8, Ordering::Relaxed).into()
    }
}

impl Default for AtomicHealthState {
    fn default() -> Self {
        Self::new(HealthState::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_round_trip() {
        for value in [Some(true), Some(false), None] {
            let state = HealthState::from(value);
            assert_eq!(Option::<bool>::from(state), value);
        }
    }

    #[test]
    fn test_atomic_swap_returns_previous() {
        let cell = AtomicHealthState::default();
        assert_eq!(cell.load(), HealthState::Unknown);
        assert_eq!(cell.swap(HealthState::Healthy), HealthState::Unknown);
        assert_eq!(cell.swap(HealthState::Unhealthy), HealthState::Healthy);
        assert_eq!(cell.load(), HealthState::Unhealthy);
    }
}
