// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Simulated devices for running the monitor on a host.

use crate::devices::{
    CharacterDisplay, DeepSleep, HttpClient, IndicatorLed, InputPin, LinkEvent, SampleSource,
    WifiLink,
};
use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use pulsewatch_core::{DeviceError, RawSample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Pulse oximeter whose readings wander around a resting baseline.
///
/// A beat is reported every `beat_every` reads.
pub struct RandomWalkSensor {
    rng: StdRng,
    heart_rate: f32,
    oxygen_saturation: f32,
    beat_every: u32,
    reads: u32,
}

impl RandomWalkSensor {
    pub fn new(seed: u64, beat_every: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            heart_rate: 72.0,
            oxygen_saturation: 97.5,
            beat_every: beat_every.max(1),
            reads: 0,
        }
    }
}

impl SampleSource for RandomWalkSensor {
    fn read(&mut self) -> Result<RawSample, DeviceError> {
        self.reads = self.reads.wrapping_add(1);
        if self.reads % self.beat_every != 0 {
            return Ok(RawSample::new(self.heart_rate, self.oxygen_saturation, false));
        }

        self.heart_rate = (self.heart_rate + self.rng.random_range(-2.0..=2.0)).clamp(40.0, 140.0);
        self.oxygen_saturation =
            (self.oxygen_saturation + self.rng.random_range(-0.4..=0.4)).clamp(85.0, 100.0);
        Ok(RawSample::beat(self.heart_rate, self.oxygen_saturation))
    }
}

const DISPLAY_COLUMNS: usize = 16;

/// 16x2 display rendered to the log.
#[derive(Debug)]
pub struct ConsoleDisplay {
    rows: [Vec<char>; 2],
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self {
            rows: [vec![' '; DISPLAY_COLUMNS], vec![' '; DISPLAY_COLUMNS]],
        }
    }
}

impl ConsoleDisplay {
    pub fn row(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }
}

impl CharacterDisplay for ConsoleDisplay {
    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DeviceError> {
        let cells = self
            .rows
            .get_mut(usize::from(row))
            .ok_or_else(|| DeviceError::new("lcd", format!("row {row} out of range")))?;

        for (cell, ch) in cells.iter_mut().skip(usize::from(col)).zip(text.chars()) {
            *cell = ch;
        }

        crate::info!("LCD [{}] [{}]", self.row(0), self.row(1));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        for cells in &mut self.rows {
            cells.fill(' ');
        }
        Ok(())
    }
}

/// LED on the configured output pin, reported through logging.
#[derive(Debug)]
pub struct ConsoleLed {
    pin: u8,
    on: bool,
}

impl ConsoleLed {
    pub fn new(pin: u8) -> Self {
        Self { pin, on: false }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl IndicatorLed for ConsoleLed {
    fn set(&mut self, on: bool) {
        if on != self.on {
            crate::debug!("LED pin {} {}", self.pin, if on { "on" } else { "off" });
        }
        self.on = on;
    }
}

/// Button driven from the host, e.g. by a key press.
#[derive(Debug, Clone, Default)]
pub struct SimulatedButton {
    low: Arc<AtomicBool>,
}

impl SimulatedButton {
    pub fn press(&self) {
        self.low.store(true, Ordering::Release);
    }

    pub fn release(&self) {
        self.low.store(false, Ordering::Release);
    }
}

impl InputPin for SimulatedButton {
    fn is_low(&self) -> bool {
        self.low.load(Ordering::Acquire)
    }
}

/// Station that associates after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedWifi {
    events: Sender<LinkEvent>,
    association_delay: Duration,
}

impl SimulatedWifi {
    /// Returns the link and the notification stream for the supervisor.
    pub fn new(association_delay: Duration) -> (Self, Receiver<LinkEvent>) {
        let (events, rx) = async_channel::unbounded();
        (
            Self {
                events,
                association_delay,
            },
            rx,
        )
    }

    /// Bring the station interface up.
    pub fn start(&self) {
        let _ = self.events.try_send(LinkEvent::Started);
    }

    /// Simulate losing the access point.
    pub fn drop_link(&self) {
        let _ = self.events.try_send(LinkEvent::Lost);
    }
}

#[async_trait]
impl WifiLink for SimulatedWifi {
    async fn associate(&self) -> Result<(), DeviceError> {
        let events = self.events.clone();
        let delay = self.association_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(LinkEvent::Associated).await;
            let _ = events.send(LinkEvent::GotIp).await;
        });
        Ok(())
    }
}

/// Logs requests instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct DryRunClient;

#[async_trait]
impl HttpClient for DryRunClient {
    async fn get(&self, url: &str) -> Result<u16, DeviceError> {
        crate::info!("[dry-run] GET {}", url);
        Ok(200)
    }
}

/// Deep sleep on a host: the process exits.
#[derive(Debug, Clone, Default)]
pub struct ProcessSleeper;

#[async_trait]
impl DeepSleep for ProcessSleeper {
    fn arm_wake_source(&self, pin: u8) {
        crate::info!("Wake source armed on pin {}", pin);
    }

    async fn enter_deep_sleep(&self) -> Infallible {
        crate::info!("Entering deep sleep");
        std::process::exit(0)
    }
}
