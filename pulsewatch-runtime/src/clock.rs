// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::Debug;
use core::future::Future;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Monotonic time source and sleeper used by every activity.
pub trait Clock: Clone + Send + Sync + Debug + 'static {
    type Instant: Copy
        + Debug
        + Ord
        + Send
        + Sync
        + Add<Duration, Output = Self::Instant>
        + Sub<Self::Instant, Output = Duration>;

    type Sleep: Future<Output = ()> + Send;

    fn now(&self) -> Self::Instant;

    /// Future that completes once `duration` has passed.
    fn sleep(&self, duration: Duration) -> Self::Sleep;

    /// Time since `earlier`; zero if `earlier` lies in the future.
    fn elapsed_since(&self, earlier: Self::Instant) -> Duration {
        let now = self.now();
        if now > earlier {
            now - earlier
        } else {
            Duration::ZERO
        }
    }
}
