// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sensor polling: the producer side of the raw-sample channel.

use crate::bus::SensorBus;
use async_channel::Sender;
use core::time::Duration;
use pulsewatch_core::{CancellationToken, MonitorError, RawSample, Result};
use pulsewatch_runtime::{timeout, Clock, SharedLock};
use tokio::select;

/// Reads the sensor once per period and forwards detected beats.
///
/// Samples without a detected pulse are discarded. A beat that cannot be
/// queued within the send timeout is dropped so the next reading is fresh.
/// A failing read is fatal and ends the activity with
/// [`MonitorError::Sensor`].
pub struct Acquisition<C, B> {
    clock: C,
    bus: B,
    tx: Sender<RawSample>,
    period: Duration,
    send_timeout: Duration,
    cancel_token: CancellationToken,
}

impl<C, B> Acquisition<C, B>
where
    C: Clock,
    B: SharedLock<SensorBus> + 'static,
{
    pub fn new(
        clock: C,
        bus: B,
        tx: Sender<RawSample>,
        period: Duration,
        send_timeout: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            clock,
            bus,
            tx,
            period,
            send_timeout,
            cancel_token,
        }
    }

    pub async fn run(self) -> Result<()> {
        crate::info!("Acquisition started");
        let cancel_token = self.cancel_token.clone();

        loop {
            select! {
                _ = cancel_token.cancelled() => {
                    break;
                }
                result = self.cycle() => {
                    result?;
                }
            }
        }

        crate::info!("Acquisition stopped");
        Ok(())
    }

    async fn cycle(&self) -> Result<()> {
        let sample = self.read()?;

        if sample.pulse_detected {
            crate::debug!(
                "Beat: {:.2} bpm, SpO2 {:.2}%",
                sample.heart_rate,
                sample.oxygen_saturation
            );
            self.forward(sample).await?;
        }

        self.clock.sleep(self.period).await;
        Ok(())
    }

    // Synchronous on the worker thread, see `SampleSource`.
    fn read(&self) -> Result<RawSample> {
        self.bus.with(|bus| bus.read()).map_err(|e| {
            crate::error!("Sensor read failed: {}", e);
            MonitorError::Sensor(e)
        })
    }

    async fn forward(&self, sample: RawSample) -> Result<()> {
        match timeout(&self.clock, self.send_timeout, self.tx.send(sample)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(MonitorError::channel_closed("raw samples")),
            Err(_) => {
                crate::debug!("Raw sample queue full, sample dropped");
                Ok(())
            }
        }
    }
}
