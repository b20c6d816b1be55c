// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types shared by every PulseWatch activity.
//!
//! - [`RawSample`] / [`Vitals`]: the two values that travel through channels
//! - [`VitalsWindow`]: fixed-size averaging of raw samples into vitals
//! - [`BreachThresholds`] / [`AlarmCell`]: breach predicate and the
//!   acknowledgement-latched alarm state
//! - [`ActivityFlag`], [`ConnectivityGate`], [`CancellationToken`]: the small
//!   signals activities use to coordinate without sharing data structures

pub mod activity;
pub mod alarm;
pub mod cancellation_token;
pub mod gate;
pub mod sample;
mod signal;
pub mod window;

pub use self::activity::ActivityFlag;
pub use self::alarm::{AlarmCell, AlarmState, BreachThresholds};
pub use self::cancellation_token::CancellationToken;
pub use self::gate::ConnectivityGate;
pub use self::sample::{RawSample, Vitals};
pub use self::window::VitalsWindow;
pub use pulsewatch_error::{DeviceError, MonitorError, Result};
