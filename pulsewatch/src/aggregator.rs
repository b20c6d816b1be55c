// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Windowed averaging and alarm evaluation.

use crate::bus::SensorBus;
use async_channel::{Receiver, Sender};
use core::time::Duration;
use pulsewatch_core::{
    AlarmCell, AlarmState, BreachThresholds, CancellationToken, MonitorError, RawSample, Result,
    Vitals, VitalsWindow,
};
use pulsewatch_runtime::{timeout, Clock, SharedLock};
use std::sync::Arc;
use tokio::select;

/// Bounded waits used by the aggregator.
#[derive(Debug, Clone, Copy)]
pub struct AggregatorTiming {
    pub receive_timeout: Duration,
    pub send_timeout: Duration,
}

/// Consumes raw samples and, once per full window:
///
/// 1. writes the means to the display,
/// 2. queues a [`Vitals`] for the uplink,
/// 3. classifies the window and updates the [`AlarmCell`].
///
/// Every loop pass, including a receive timeout, ends with
/// [`AlarmCell::settle`], which is where an acknowledged alarm returns to
/// `Normal`.
pub struct Aggregator<C, B> {
    clock: C,
    bus: B,
    rx: Receiver<RawSample>,
    tx: Sender<Vitals>,
    window: VitalsWindow,
    thresholds: BreachThresholds,
    alarm: Arc<AlarmCell>,
    timing: AggregatorTiming,
    cancel_token: CancellationToken,
}

impl<C, B> Aggregator<C, B>
where
    C: Clock,
    B: SharedLock<SensorBus> + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: C,
        bus: B,
        rx: Receiver<RawSample>,
        tx: Sender<Vitals>,
        window: VitalsWindow,
        thresholds: BreachThresholds,
        alarm: Arc<AlarmCell>,
        timing: AggregatorTiming,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            clock,
            bus,
            rx,
            tx,
            window,
            thresholds,
            alarm,
            timing,
            cancel_token,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        crate::info!("Aggregator started");
        let cancel_token = self.cancel_token.clone();

        loop {
            select! {
                _ = cancel_token.cancelled() => {
                    break;
                }
                result = self.step() => {
                    result?;
                }
            }
        }

        crate::info!("Aggregator stopped");
        Ok(())
    }

    async fn step(&mut self) -> Result<()> {
        let received = timeout(&self.clock, self.timing.receive_timeout, self.rx.recv()).await;

        match received {
            Ok(Ok(sample)) => self.accept(sample).await?,
            Ok(Err(_)) => return Err(MonitorError::channel_closed("raw samples")),
            Err(_) => {}
        }

        let before = self.alarm.state();
        if self.alarm.settle() != before {
            crate::info!("Alarm acknowledged, back to normal");
        }
        Ok(())
    }

    async fn accept(&mut self, sample: RawSample) -> Result<()> {
        let Some(vitals) = self.window.push(&sample) else {
            return Ok(());
        };

        crate::info!("{}", vitals);
        self.show(&vitals);
        self.publish(vitals).await?;

        let breach = self.thresholds.is_breach(&vitals);
        let state = self.alarm.evaluate(breach);
        if breach {
            crate::warn!("Vitals outside safe range: {}", vitals);
        } else if state == AlarmState::Emergency {
            crate::debug!("Window in range, alarm still unacknowledged");
        }
        Ok(())
    }

    fn show(&self, vitals: &Vitals) {
        if let Err(e) = self.bus.with(|bus| bus.show_vitals(vitals)) {
            crate::warn!("{}", MonitorError::Display(e));
        }
    }

    async fn publish(&self, vitals: Vitals) -> Result<()> {
        match timeout(&self.clock, self.timing.send_timeout, self.tx.send(vitals)).await {
            Ok(Ok(())) => {
                crate::debug!("Vitals queued for uplink");
                Ok(())
            }
            Ok(Err(_)) => Err(MonitorError::channel_closed("vitals")),
            Err(_) => {
                crate::debug!("Vitals queue full, window dropped");
                Ok(())
            }
        }
    }
}
