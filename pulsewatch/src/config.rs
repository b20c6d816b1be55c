// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Monitor configuration.
//!
//! Every cadence, capacity and threshold the activities use lives here rather
//! than in the activity code. All fields have defaults, so an empty TOML
//! document yields the reference configuration:
//!
//! ```toml
//! [timing]
//! acquisition_period_ms = 10
//! idle_timeout_ms = 2000
//!
//! [uplink]
//! server_base = "http://blynk.cloud"
//! device_token = "my-token"
//! ```

use core::time::Duration;
use pulsewatch_core::{BreachThresholds, MonitorError, Result};
use pulsewatch_error::ResultExt;
use serde::Deserialize;
use std::path::Path;

/// Complete monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub timing: TimingConfig,
    pub window: WindowConfig,
    pub thresholds: BreachThresholds,
    pub channels: ChannelConfig,
    pub uplink: UplinkConfig,
    pub pins: PinConfig,
}

/// Activity cadences and bounded-wait durations, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub acquisition_period_ms: u64,
    pub raw_send_timeout_ms: u64,
    pub aggregate_receive_timeout_ms: u64,
    pub vitals_send_timeout_ms: u64,
    pub uplink_pace_ms: u64,
    pub button_poll_timeout_ms: u64,
    pub power_tick_ms: u64,
    pub idle_timeout_ms: u64,
    pub emergency_blink_ms: u64,
    pub normal_blink_ms: u64,
    /// How long the power manager waits for the first association before
    /// starting anyway
    pub link_wait_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            acquisition_period_ms: 10,
            raw_send_timeout_ms: 1000,
            aggregate_receive_timeout_ms: 500,
            vitals_send_timeout_ms: 1000,
            uplink_pace_ms: 100,
            button_poll_timeout_ms: 50,
            power_tick_ms: 1000,
            idle_timeout_ms: 2000,
            emergency_blink_ms: 200,
            normal_blink_ms: 1000,
            link_wait_ms: 30_000,
        }
    }
}

impl TimingConfig {
    pub fn acquisition_period(&self) -> Duration {
        Duration::from_millis(self.acquisition_period_ms)
    }

    pub fn raw_send_timeout(&self) -> Duration {
        Duration::from_millis(self.raw_send_timeout_ms)
    }

    pub fn aggregate_receive_timeout(&self) -> Duration {
        Duration::from_millis(self.aggregate_receive_timeout_ms)
    }

    pub fn vitals_send_timeout(&self) -> Duration {
        Duration::from_millis(self.vitals_send_timeout_ms)
    }

    pub fn uplink_pace(&self) -> Duration {
        Duration::from_millis(self.uplink_pace_ms)
    }

    pub fn button_poll_timeout(&self) -> Duration {
        Duration::from_millis(self.button_poll_timeout_ms)
    }

    pub fn power_tick(&self) -> Duration {
        Duration::from_millis(self.power_tick_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn emergency_blink(&self) -> Duration {
        Duration::from_millis(self.emergency_blink_ms)
    }

    pub fn normal_blink(&self) -> Duration {
        Duration::from_millis(self.normal_blink_ms)
    }

    pub fn link_wait(&self) -> Duration {
        Duration::from_millis(self.link_wait_ms)
    }

    fn periods(&self) -> [(&'static str, u64); 11] {
        [
            ("acquisition_period_ms", self.acquisition_period_ms),
            ("raw_send_timeout_ms", self.raw_send_timeout_ms),
            ("aggregate_receive_timeout_ms", self.aggregate_receive_timeout_ms),
            ("vitals_send_timeout_ms", self.vitals_send_timeout_ms),
            ("uplink_pace_ms", self.uplink_pace_ms),
            ("button_poll_timeout_ms", self.button_poll_timeout_ms),
            ("power_tick_ms", self.power_tick_ms),
            ("idle_timeout_ms", self.idle_timeout_ms),
            ("emergency_blink_ms", self.emergency_blink_ms),
            ("normal_blink_ms", self.normal_blink_ms),
            ("link_wait_ms", self.link_wait_ms),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Samples per averaged window
    pub size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { size: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub raw_capacity: usize,
    pub vitals_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            raw_capacity: 20,
            vitals_capacity: 5,
        }
    }
}

/// Dashboard endpoint and the virtual-pin fields vitals are written to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UplinkConfig {
    pub server_base: String,
    pub device_token: String,
    pub heart_rate_field: String,
    pub spo2_field: String,
}

impl Default for UplinkConfig {
    fn default() -> Self {
        Self {
            server_base: "http://blynk.cloud".to_string(),
            device_token: String::new(),
            heart_rate_field: "V3".to_string(),
            spo2_field: "V4".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub button: u8,
    pub led: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self { button: 0, led: 2 }
    }
}

impl MonitorConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns [`MonitorError::Config`] if the document does not parse or a
    /// value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| MonitorError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// Returns [`MonitorError::Config`] if the file cannot be read, does not
    /// parse, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| MonitorError::config(e.to_string()))
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("loading {}", path.display()))
    }

    /// Check the values the activities rely on.
    ///
    /// # Errors
    /// Returns [`MonitorError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.window.size == 0 {
            return Err(MonitorError::config("window.size must be non-zero"));
        }
        if self.channels.raw_capacity == 0 {
            return Err(MonitorError::config("channels.raw_capacity must be non-zero"));
        }
        if self.channels.vitals_capacity == 0 {
            return Err(MonitorError::config(
                "channels.vitals_capacity must be non-zero",
            ));
        }
        if let Some((name, _)) = self.timing.periods().iter().find(|(_, ms)| *ms == 0) {
            return Err(MonitorError::config(format!(
                "timing.{name} must be non-zero"
            )));
        }
        if self.uplink.server_base.is_empty() {
            return Err(MonitorError::config("uplink.server_base must be set"));
        }
        Ok(())
    }
}
