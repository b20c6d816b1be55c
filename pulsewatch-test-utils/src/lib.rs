// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the PulseWatch monitor.
//!
//! - [`fakes`]: scripted and recording implementations of every device trait
//! - [`fixtures`]: canonical readings and a test configuration
//! - [`helpers`]: paused-clock stepping and LED timing analysis
//!
//! Intended for tests only.
//!
//! ```rust
//! use pulsewatch_test_utils::fakes::ScriptedSensor;
//! use pulsewatch_test_utils::fixtures::resting;
//! use pulsewatch::devices::SampleSource;
//!
//! let mut sensor = ScriptedSensor::new();
//! sensor.push(resting());
//!
//! assert_eq!(sensor.read().unwrap(), resting());
//! assert!(!sensor.read().unwrap().pulse_detected);
//! ```

pub mod fakes;
pub mod fixtures;
pub mod helpers;

pub use fakes::{
    DisplayWrite, FakeLink, FakePin, FakeSleeper, RecordingDisplay, RecordingHttp, RecordingLed,
    ScriptedSensor,
};
pub use helpers::{
    advance_by, assert_close, led_phases, shared_bus, yield_to_tasks, FakeDevices, Probes,
    TokioBus,
};
