// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Threshold classification and the acknowledgement-latched alarm.
//!
//! # State machine
//!
//! ```text
//!            evaluate(breach)                 settle() with latch clear
//!  Normal ───────────────────► Emergency ───────────────────────────────► Normal
//!                                 │  ▲
//!                  acknowledge()  │  │ evaluate(breach) re-latches
//!                  clears latch   ▼  │
//!                             Emergency (latch clear)
//! ```
//!
//! The visible [`AlarmState`] and the latched "unacknowledged" bit are two
//! independent atomics. A breach always wins: it sets `Emergency` and latches
//! the bit, even if the previous alarm was just acknowledged. A clean window
//! only returns to `Normal` when the latch is already clear. Acknowledging
//! clears the latch but never touches the visible state; the aggregator's next
//! evaluation pass ([`AlarmCell::settle`]) performs the revert.

use crate::sample::Vitals;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use serde::Deserialize;

/// Classification shown on the indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlarmState {
    #[default]
    Normal = 0,
    Emergency = 1,
}

impl AlarmState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Emergency,
            _ => Self::Normal,
        }
    }
}

/// Safety limits for one averaged window.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BreachThresholds {
    /// Heart rate strictly above this is a breach
    pub heart_rate_high: f32,
    /// Heart rate strictly below this is a breach
    pub heart_rate_low: f32,
    /// Oxygen saturation strictly below this is a breach
    pub spo2_low: f32,
}

impl Default for BreachThresholds {
    fn default() -> Self {
        Self {
            heart_rate_high: 100.0,
            heart_rate_low: 50.0,
            spo2_low: 90.0,
        }
    }
}

impl BreachThresholds {
    /// The breach predicate.
    pub fn is_breach(&self, vitals: &Vitals) -> bool {
        vitals.mean_heart_rate > self.heart_rate_high
            || vitals.mean_heart_rate < self.heart_rate_low
            || vitals.mean_oxygen_saturation < self.spo2_low
    }
}

/// Shared alarm state: written by the aggregator, cleared by the input
/// watcher, read by the indicator.
#[derive(Debug, Default)]
pub struct AlarmCell {
    state: AtomicU8,
    unacknowledged: AtomicBool,
}

impl AlarmCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AlarmState {
        AlarmState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_unacknowledged(&self) -> bool {
        self.unacknowledged.load(Ordering::Acquire)
    }

    /// Apply the result of one window evaluation and return the new state.
    pub fn evaluate(&self, breach: bool) -> AlarmState {
        if breach {
            self.unacknowledged.store(true, Ordering::Release);
            self.set(AlarmState::Emergency);
            return AlarmState::Emergency;
        }

        if !self.is_unacknowledged() {
            self.set(AlarmState::Normal);
        }
        self.state()
    }

    /// Revert to `Normal` when the latch has been cleared.
    ///
    /// Runs on every aggregator loop pass, including receive timeouts.
    pub fn settle(&self) -> AlarmState {
        if self.state() != AlarmState::Normal && !self.is_unacknowledged() {
            self.set(AlarmState::Normal);
        }
        self.state()
    }

    /// Clear the latch. Returns whether an unacknowledged alarm was pending.
    pub fn acknowledge(&self) -> bool {
        self.unacknowledged.swap(false, Ordering::AcqRel)
    }

    fn set(&self, state: AlarmState) {
        self.state.store(state as u8, Ordering::Release);
    }
}
