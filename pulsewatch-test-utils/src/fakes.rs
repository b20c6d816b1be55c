// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fake collaborators.
//!
//! Every fake is a cheap, cloneable handle over shared state: hand one clone
//! to the monitor and keep another in the test to script behaviour and
//! inspect what happened.

use async_trait::async_trait;
use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use parking_lot::Mutex;
use pulsewatch::devices::{
    CharacterDisplay, DeepSleep, HttpClient, IndicatorLed, InputPin, SampleSource, WifiLink,
};
use pulsewatch_core::{DeviceError, RawSample};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::time::Instant;

/// Sensor that replays a script, then repeats a fallback reading forever.
#[derive(Clone)]
pub struct ScriptedSensor {
    inner: Arc<Mutex<SensorScript>>,
}

struct SensorScript {
    queued: VecDeque<Result<RawSample, DeviceError>>,
    fallback: RawSample,
    reads: usize,
}

impl ScriptedSensor {
    /// A sensor that never detects a pulse until readings are queued.
    pub fn new() -> Self {
        Self::repeating(RawSample::new(0.0, 0.0, false))
    }

    /// A sensor that returns `sample` whenever the script is empty.
    pub fn repeating(sample: RawSample) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SensorScript {
                queued: VecDeque::new(),
                fallback: sample,
                reads: 0,
            })),
        }
    }

    pub fn push(&self, sample: RawSample) -> &Self {
        self.inner.lock().queued.push_back(Ok(sample));
        self
    }

    pub fn push_many(&self, sample: RawSample, count: usize) -> &Self {
        let mut inner = self.inner.lock();
        inner.queued.extend((0..count).map(|_| Ok(sample)));
        drop(inner);
        self
    }

    pub fn push_failure(&self, message: &str) -> &Self {
        self.inner
            .lock()
            .queued
            .push_back(Err(DeviceError::new("sensor", message)));
        self
    }

    pub fn set_fallback(&self, sample: RawSample) {
        self.inner.lock().fallback = sample;
    }

    pub fn reads(&self) -> usize {
        self.inner.lock().reads
    }

    pub fn remaining(&self) -> usize {
        self.inner.lock().queued.len()
    }
}

impl Default for ScriptedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for ScriptedSensor {
    fn read(&mut self) -> Result<RawSample, DeviceError> {
        let mut inner = self.inner.lock();
        inner.reads += 1;
        let fallback = inner.fallback;
        inner.queued.pop_front().unwrap_or(Ok(fallback))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayWrite {
    pub row: u8,
    pub col: u8,
    pub text: String,
}

/// Display that records every write.
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    writes: Arc<Mutex<Vec<DisplayWrite>>>,
    clears: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<DisplayWrite> {
        self.writes.lock().clone()
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::Acquire)
    }

    /// Make subsequent writes fail.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }
}

impl CharacterDisplay for RecordingDisplay {
    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DeviceError> {
        if self.failing.load(Ordering::Acquire) {
            return Err(DeviceError::new("display", "bus error"));
        }
        self.writes.lock().push(DisplayWrite {
            row,
            col,
            text: text.to_string(),
        });
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        self.clears.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

/// HTTP client that records requests and answers from a script.
///
/// Each request takes `latency` of (paused) time. The highest number of
/// requests observed in flight at once is tracked.
#[derive(Clone)]
pub struct RecordingHttp {
    requests: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<VecDeque<Result<u16, DeviceError>>>>,
    latency: Arc<Mutex<core::time::Duration>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl Default for RecordingHttp {
    fn default() -> Self {
        Self {
            requests: Arc::default(),
            responses: Arc::default(),
            latency: Arc::new(Mutex::new(core::time::Duration::ZERO)),
            in_flight: Arc::default(),
            max_in_flight: Arc::default(),
        }
    }
}

impl RecordingHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Queue a transport failure for the next request.
    pub fn fail_next(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(DeviceError::new("http", message)));
    }

    /// Queue a status for the next request. Unscripted requests get 200.
    pub fn respond_next(&self, status: u16) {
        self.responses.lock().push_back(Ok(status));
    }

    pub fn set_latency(&self, latency: core::time::Duration) {
        *self.latency.lock() = latency;
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::Acquire)
    }
}

#[async_trait]
impl HttpClient for RecordingHttp {
    async fn get(&self, url: &str) -> Result<u16, DeviceError> {
        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.max_in_flight.fetch_max(now, Ordering::AcqRel);
        self.requests.lock().push(url.to_string());

        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let response = self.responses.lock().pop_front().unwrap_or(Ok(200));
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        response
    }
}

/// Link whose association requests are counted and can be made to fail.
#[derive(Clone, Default)]
pub struct FakeLink {
    attempts: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl FakeLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }
}

#[async_trait]
impl WifiLink for FakeLink {
    async fn associate(&self) -> Result<(), DeviceError> {
        self.attempts.fetch_add(1, Ordering::AcqRel);
        if self.failing.load(Ordering::Acquire) {
            Err(DeviceError::new("wifi", "association rejected"))
        } else {
            Ok(())
        }
    }
}

/// LED that records every transition with its (tokio) timestamp.
#[derive(Clone, Default)]
pub struct RecordingLed {
    transitions: Arc<Mutex<Vec<(Instant, bool)>>>,
}

impl RecordingLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<(Instant, bool)> {
        self.transitions.lock().clone()
    }
}

impl IndicatorLed for RecordingLed {
    fn set(&mut self, on: bool) {
        self.transitions.lock().push((Instant::now(), on));
    }
}

/// Input pin held at whatever level the test sets.
#[derive(Clone, Default)]
pub struct FakePin {
    low: Arc<AtomicBool>,
}

impl FakePin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_low(&self, low: bool) {
        self.low.store(low, Ordering::Release);
    }
}

impl InputPin for FakePin {
    fn is_low(&self) -> bool {
        self.low.load(Ordering::Acquire)
    }
}

/// Deep-sleep controller that records entry and then parks the caller.
#[derive(Clone, Default)]
pub struct FakeSleeper {
    armed_pin: Arc<Mutex<Option<u8>>>,
    entered_at: Arc<Mutex<Option<Instant>>>,
}

impl FakeSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed_pin(&self) -> Option<u8> {
        *self.armed_pin.lock()
    }

    pub fn entered_at(&self) -> Option<Instant> {
        *self.entered_at.lock()
    }

    pub fn is_sleeping(&self) -> bool {
        self.entered_at().is_some()
    }
}

#[async_trait]
impl DeepSleep for FakeSleeper {
    fn arm_wake_source(&self, pin: u8) {
        *self.armed_pin.lock() = Some(pin);
    }

    async fn enter_deep_sleep(&self) -> Infallible {
        *self.entered_at.lock() = Some(Instant::now());
        std::future::pending().await
    }
}
