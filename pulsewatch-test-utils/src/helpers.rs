// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::fakes::{
    FakeLink, FakePin, FakeSleeper, RecordingDisplay, RecordingHttp, RecordingLed, ScriptedSensor,
};
use pulsewatch::bus::SensorBus;
use pulsewatch::Devices;
use pulsewatch_runtime::{Platform, SharedLock, TokioPlatform};
use std::time::Duration;
use tokio::time::Instant;

/// The shared sensor bus as the tokio platform builds it.
pub type TokioBus = <TokioPlatform as Platform>::Lock<SensorBus>;

pub fn shared_bus(sensor: ScriptedSensor, display: RecordingDisplay) -> TokioBus {
    <TokioBus as SharedLock<SensorBus>>::new(SensorBus::new(sensor, display))
}

/// The full set of fakes, typed as the monitor expects them.
pub type FakeDevices = Devices<
    ScriptedSensor,
    RecordingDisplay,
    RecordingHttp,
    FakeLink,
    RecordingLed,
    FakePin,
    FakeSleeper,
>;

/// Test-side clones of every fake in a [`FakeDevices`].
#[derive(Clone, Default)]
pub struct Probes {
    pub sensor: ScriptedSensor,
    pub display: RecordingDisplay,
    pub http: RecordingHttp,
    pub wifi: FakeLink,
    pub led: RecordingLed,
    pub button: FakePin,
    pub sleeper: FakeSleeper,
}

impl Probes {
    pub fn new(sensor: ScriptedSensor) -> Self {
        Self {
            sensor,
            ..Self::default()
        }
    }

    pub fn devices(&self) -> FakeDevices {
        Devices {
            sensor: self.sensor.clone(),
            display: self.display.clone(),
            http: self.http.clone(),
            wifi: self.wifi.clone(),
            led: self.led.clone(),
            button: self.button.clone(),
            sleeper: self.sleeper.clone(),
        }
    }
}

/// Let spawned tasks run to their next suspension point without moving the
/// paused clock.
pub async fn yield_to_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock in `step`s, letting tasks run after each one.
pub async fn advance_by(total: Duration, step: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        let next = step.min(total - elapsed);
        tokio::time::advance(next).await;
        yield_to_tasks().await;
        elapsed += next;
    }
}

/// Durations between consecutive LED transitions, paired with the level the
/// LED held during each interval.
pub fn led_phases(transitions: &[(Instant, bool)]) -> Vec<(bool, Duration)> {
    transitions
        .windows(2)
        .map(|pair| (pair[0].1, pair[1].0 - pair[0].0))
        .collect()
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}
