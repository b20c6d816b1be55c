// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tokio platform: tokio's clock and a `parking_lot` mutex.

use crate::clock::Clock;
use crate::platform::Platform;
use crate::shared::SharedLock;
use core::time::Duration;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPlatform;

impl Platform for TokioPlatform {
    type Clock = TokioClock;
    type Lock<T: Send + 'static> = ParkingLock<T>;
}

/// Reads `tokio::time::Instant`, so a paused test clock moves `now()` and
/// `sleep()` together.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    type Instant = tokio::time::Instant;
    type Sleep = tokio::time::Sleep;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }
}

pub struct ParkingLock<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for ParkingLock<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> SharedLock<T> for ParkingLock<T> {
    fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}
