// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! PulseWatch: a concurrent vital-signs monitor.
//!
//! The monitor samples a pulse oximeter at 100 Hz, averages detected beats
//! into windows, classifies each window against safety thresholds and
//! forwards the averages to a remote dashboard. Seven independent activities
//! cooperate through bounded channels, one bus mutex and a handful of atomic
//! signals:
//!
//! | activity                                       | role                                  |
//! |------------------------------------------------|---------------------------------------|
//! | [`Acquisition`](acquisition::Acquisition)      | sensor polling, raw-sample producer   |
//! | [`Aggregator`](aggregator::Aggregator)         | window averaging, display, alarm      |
//! | [`Uplink`](uplink::Uplink)                     | dashboard requests                    |
//! | [`AlarmIndicator`](indicator::AlarmIndicator)  | LED blink cadence                     |
//! | [`InputWatcher`](input::InputWatcher)          | button presses, acknowledgement       |
//! | [`PowerManager`](power::PowerManager)          | idle timeout, deep sleep              |
//! | [`ConnectivitySupervisor`](connectivity::ConnectivitySupervisor) | association state |
//!
//! [`Monitor`] wires them together from a [`MonitorConfig`] and a set of
//! [`Devices`].
//!
//! # Example
//!
//! ```no_run
//! use pulsewatch::config::MonitorConfig;
//! use pulsewatch::sim::{
//!     ConsoleDisplay, ConsoleLed, DryRunClient, ProcessSleeper, RandomWalkSensor,
//!     SimulatedButton, SimulatedWifi,
//! };
//! use pulsewatch::{Devices, TokioMonitor};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> pulsewatch_core::Result<()> {
//! let config = MonitorConfig::default();
//! let (wifi, link_events) = SimulatedWifi::new(Duration::from_millis(500));
//! wifi.start();
//!
//! let devices = Devices {
//!     sensor: RandomWalkSensor::new(1, 10),
//!     display: ConsoleDisplay::default(),
//!     http: DryRunClient,
//!     wifi,
//!     led: ConsoleLed::new(config.pins.led),
//!     button: SimulatedButton::default(),
//!     sleeper: ProcessSleeper,
//! };
//!
//! let handle = TokioMonitor::new(config)?.start(devices, link_events)?;
//! handle.join().await
//! # }
//! ```

pub mod acquisition;
pub mod aggregator;
pub mod bus;
pub mod config;
pub mod connectivity;
pub mod devices;
#[cfg(feature = "host")]
pub mod http;
pub mod indicator;
pub mod input;
mod logging;
pub mod monitor;
pub mod power;
pub mod sim;
pub mod uplink;

pub use self::config::MonitorConfig;
pub use self::devices::{
    CharacterDisplay, DeepSleep, HttpClient, IndicatorLed, InputPin, LinkEvent, SampleSource,
    WifiLink,
};
pub use self::monitor::{Devices, Monitor, MonitorHandle, TokioMonitor};
