// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::devices::IndicatorLed;
use core::time::Duration;
use pulsewatch_core::{AlarmCell, AlarmState, CancellationToken, Result};
use pulsewatch_runtime::Clock;
use std::sync::Arc;
use tokio::select;

/// Blinks the LED at a cadence chosen by the alarm state.
///
/// The state is sampled before each on and off phase, so a change is visible
/// within one half-period.
pub struct AlarmIndicator<C, L> {
    clock: C,
    led: L,
    alarm: Arc<AlarmCell>,
    emergency_half_period: Duration,
    normal_half_period: Duration,
    cancel_token: CancellationToken,
}

impl<C, L> AlarmIndicator<C, L>
where
    C: Clock,
    L: IndicatorLed,
{
    pub fn new(
        clock: C,
        led: L,
        alarm: Arc<AlarmCell>,
        emergency_half_period: Duration,
        normal_half_period: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            clock,
            led,
            alarm,
            emergency_half_period,
            normal_half_period,
            cancel_token,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        crate::info!("Alarm indicator started");
        let cancel_token = self.cancel_token.clone();

        loop {
            select! {
                _ = cancel_token.cancelled() => {
                    break;
                }
                _ = self.blink() => {}
            }
        }

        self.led.set(false);
        crate::info!("Alarm indicator stopped");
        Ok(())
    }

    async fn blink(&mut self) {
        self.phase(true).await;
        self.phase(false).await;
    }

    /// One half of a blink. The state is read fresh for every half, so a
    /// change shows up within one half-period.
    async fn phase(&mut self, on: bool) {
        let half_period = self.half_period();
        self.led.set(on);
        self.clock.sleep(half_period).await;
    }

    fn half_period(&self) -> Duration {
        match self.alarm.state() {
            AlarmState::Emergency => self.emergency_half_period,
            AlarmState::Normal => self.normal_half_period,
        }
    }
}
