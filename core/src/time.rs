//! Time management for the simulation
//!
//! The simulation operates in discrete, abstract ticks (spec.md §1: "no
//! real wall-clock time semantics"). This module provides deterministic
//! tick advancement for the engine's main loop.

use serde::{Deserialize, Serialize};

/// Tracks the current tick of a running simulation.
///
/// # Example
/// ```
/// use snsim_core::time::Clock;
///
/// let mut clock = Clock::new();
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance();
/// assert_eq!(clock.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    current_tick: usize,
}

impl Clock {
    /// Create a clock starting at tick 0.
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.current_tick += 1;
    }

    /// Current tick number.
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Reset the clock back to tick 0.
    pub fn reset(&mut self) {
        self.current_tick = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(Clock::new().current_tick(), 0);
    }

    #[test]
    fn advances_by_one() {
        let mut clock = Clock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick(), 2);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut clock = Clock::new();
        clock.advance();
        clock.advance();
        clock.reset();
        assert_eq!(clock.current_tick(), 0);
    }
}
