// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounded waits on top of any [`Clock`].
//!
//! Every blocking operation in the monitor, apart from the uplink's wait for
//! vitals, is wrapped in [`timeout`]. The inner future is always polled before
//! the deadline, so an operation that is ready at the same instant the timer
//! fires still succeeds.

use crate::clock::Clock;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;
use pin_project::pin_project;

/// The deadline passed before the inner future completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deadline of {:?} elapsed", self.0)
    }
}

impl std::error::Error for Elapsed {}

/// Future returned by [`timeout`].
#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub struct Timeout<F, S> {
    #[pin]
    future: F,
    #[pin]
    sleep: S,
    duration: Duration,
}

impl<F, S> Future for Timeout<F, S>
where
    F: Future,
    S: Future<Output = ()>,
{
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if let Poll::Ready(output) = this.future.poll(cx) {
            return Poll::Ready(Ok(output));
        }

        match this.sleep.poll(cx) {
            Poll::Ready(()) => Poll::Ready(Err(Elapsed(*this.duration))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Run `future` for at most `duration` as measured by `clock`.
///
/// # Example
///
/// ```
/// use pulsewatch_runtime::{timeout, TokioClock};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let result = timeout(&TokioClock, Duration::from_millis(10), async { 7 }).await;
/// assert_eq!(result, Ok(7));
/// # }
/// ```
pub fn timeout<C, F>(clock: &C, duration: Duration, future: F) -> Timeout<F, C::Sleep>
where
    C: Clock,
    F: Future,
{
    Timeout {
        future,
        sleep: clock.sleep(duration),
        duration,
    }
}
