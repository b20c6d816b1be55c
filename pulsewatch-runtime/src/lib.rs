// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Executor seam for the monitor's activities.
//!
//! Activities never reach for the executor directly for time or locking. They
//! go through [`Clock`], [`SharedLock`] and [`timeout`], so the same activity
//! code runs on the device executor and on tokio's paused test clock.

pub mod clock;
pub mod platform;
pub mod shared;
pub mod timeout;
#[cfg(feature = "runtime-tokio")]
pub mod tokio_platform;

pub use clock::Clock;
pub use platform::Platform;
pub use shared::SharedLock;
pub use timeout::{timeout, Elapsed, Timeout};

#[cfg(feature = "runtime-tokio")]
pub use tokio_platform::{ParkingLock, TokioClock, TokioPlatform};
