// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Interfaces to the external collaborators.
//!
//! The monitor only sees these traits. Hardware drivers, the host simulation
//! ([`crate::sim`]) and the test fakes all implement them.

use async_trait::async_trait;
use core::convert::Infallible;
use pulsewatch_core::{DeviceError, RawSample};

/// Pulse oximeter. `read` blocks the caller for the duration of one bus
/// transaction.
///
/// The read runs on an executor worker with the bus lock held. On a
/// single-threaded executor a slow read therefore stalls every other
/// activity, LED cadence included, until it returns. Implementations must
/// keep a read well below the shortest configured half-period, or the
/// monitor must run on a multi-threaded executor.
pub trait SampleSource: Send + 'static {
    fn read(&mut self) -> Result<RawSample, DeviceError>;
}

/// Two-line character display sharing the sensor's bus.
pub trait CharacterDisplay: Send + 'static {
    /// Write `text` starting at `row`/`col`. Text past the end of the row is
    /// cut off, not wrapped.
    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DeviceError>;

    fn clear(&mut self) -> Result<(), DeviceError>;
}

/// Outbound HTTP.
#[async_trait]
pub trait HttpClient: Send + Sync + 'static {
    /// Perform a GET and return the response status.
    ///
    /// `Err` means the transport failed. Any status code counts as success.
    async fn get(&self, url: &str) -> Result<u16, DeviceError>;
}

/// Notifications from the network stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The station interface came up
    Started,
    /// Associated with the access point
    Associated,
    /// An address was obtained
    GotIp,
    /// Association was lost
    Lost,
}

/// Wi-Fi station control. Outcomes arrive as [`LinkEvent`]s.
#[async_trait]
pub trait WifiLink: Send + Sync + 'static {
    /// Request association with the configured access point.
    async fn associate(&self) -> Result<(), DeviceError>;
}

pub trait IndicatorLed: Send + 'static {
    fn set(&mut self, on: bool);
}

/// Pull-up input, active low.
pub trait InputPin: Send + Sync + 'static {
    fn is_low(&self) -> bool;
}

/// Deep-sleep controller.
#[async_trait]
pub trait DeepSleep: Send + Sync + 'static {
    /// Configure `pin` going low as the wake-up source.
    fn arm_wake_source(&self, pin: u8);

    /// Power down. A wake-up restarts the firmware from scratch, so this never
    /// resolves.
    async fn enter_deep_sleep(&self) -> Infallible;
}
