// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Idle-timeout power management.
//!
//! ```text
//!            idle > timeout               enter_deep_sleep()
//!  Active ───────────────────► SleepPending ──────────────────► Sleeping
//!    ▲  │
//!    └──┘ activity observed: baseline = now
//! ```
//!
//! `Sleeping` is terminal. [`DeepSleep::enter_deep_sleep`] resolves to
//! [`Infallible`](core::convert::Infallible), so nothing runs after it; the
//! next boot starts from scratch.

use crate::devices::DeepSleep;
use core::time::Duration;
use pulsewatch_core::{ActivityFlag, CancellationToken, ConnectivityGate, Result};
use pulsewatch_runtime::{timeout, Clock};
use std::sync::Arc;
use tokio::select;

/// Where the idle state machine stands after a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Active,
    SleepPending,
}

#[derive(Debug, Clone, Copy)]
pub struct PowerTiming {
    pub tick: Duration,
    pub idle_timeout: Duration,
    /// Longest wait for the first association before ticking starts
    pub link_wait: Duration,
}

pub struct PowerManager<C: Clock, Z> {
    clock: C,
    sleeper: Z,
    wake_pin: u8,
    activity: Arc<ActivityFlag>,
    gate: Arc<ConnectivityGate>,
    timing: PowerTiming,
    baseline: C::Instant,
    cancel_token: CancellationToken,
}

impl<C, Z> PowerManager<C, Z>
where
    C: Clock,
    Z: DeepSleep,
{
    pub fn new(
        clock: C,
        sleeper: Z,
        wake_pin: u8,
        activity: Arc<ActivityFlag>,
        gate: Arc<ConnectivityGate>,
        timing: PowerTiming,
        cancel_token: CancellationToken,
    ) -> Self {
        let baseline = clock.now();
        Self {
            clock,
            sleeper,
            wake_pin,
            activity,
            gate,
            timing,
            baseline,
            cancel_token,
        }
    }

    /// Consume the activity flag and compare idle time against the timeout.
    pub fn check(&mut self) -> PowerState {
        if self.activity.take() {
            self.baseline = self.clock.now();
            return PowerState::Active;
        }

        if self.idle_for() > self.timing.idle_timeout {
            PowerState::SleepPending
        } else {
            PowerState::Active
        }
    }

    pub fn idle_for(&self) -> Duration {
        self.clock.elapsed_since(self.baseline)
    }

    /// Runs until cancelled or until the device powers down.
    pub async fn run(mut self) -> Result<()> {
        let cancel_token = self.cancel_token.clone();

        select! {
            _ = cancel_token.cancelled() => {
                return Ok(());
            }
            _ = self.startup() => {}
        }

        loop {
            select! {
                _ = cancel_token.cancelled() => {
                    break;
                }
                state = self.tick() => {
                    if state == PowerState::SleepPending {
                        crate::info!(
                            "No activity for {:?}, entering deep sleep",
                            self.idle_for()
                        );
                        match self.sleeper.enter_deep_sleep().await {}
                    }
                }
            }
        }

        crate::info!("Power manager stopped");
        Ok(())
    }

    async fn startup(&mut self) {
        if timeout(&self.clock, self.timing.link_wait, self.gate.wait())
            .await
            .is_err()
        {
            crate::warn!(
                "No association after {:?}, starting power management anyway",
                self.timing.link_wait
            );
        }

        self.sleeper.arm_wake_source(self.wake_pin);
        self.baseline = self.clock.now();
        crate::info!(
            "Power manager started, idle timeout {:?}",
            self.timing.idle_timeout
        );
    }

    async fn tick(&mut self) -> PowerState {
        self.clock.sleep(self.timing.tick).await;
        self.check()
    }
}
