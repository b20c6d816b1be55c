// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Wiring: builds the channels and shared state, then spawns every activity.
//!
//! ```text
//! SampleSource ─► Acquisition ─[raw]─► Aggregator ─[vitals]─► Uplink ─► HTTP
//!                                         │   │                 ▲
//!                                 display ◄   ▼ AlarmCell       │ gate
//!                                      AlarmIndicator     ConnectivitySupervisor
//! ButtonInterrupt ─[1]─► InputWatcher ─► ActivityFlag ─► PowerManager ─► DeepSleep
//! ```

use crate::acquisition::Acquisition;
use crate::aggregator::{Aggregator, AggregatorTiming};
use crate::bus::SensorBus;
use crate::config::MonitorConfig;
use crate::connectivity::ConnectivitySupervisor;
use crate::devices::{
    CharacterDisplay, DeepSleep, HttpClient, IndicatorLed, InputPin, LinkEvent, SampleSource,
    WifiLink,
};
use crate::indicator::AlarmIndicator;
use crate::input::{button_channel, ButtonInterrupt, InputWatcher};
use crate::power::{PowerManager, PowerTiming};
use crate::uplink::{RequestGuard, Uplink};
use async_channel::Receiver;
use core::marker::PhantomData;
use futures::future::select_all;
use futures::lock::Mutex;
use pulsewatch_core::{
    ActivityFlag, AlarmCell, CancellationToken, ConnectivityGate, MonitorError, Result,
    VitalsWindow,
};
use pulsewatch_runtime::{Platform, SharedLock, TokioPlatform};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Every external collaborator the monitor drives.
pub struct Devices<S, D, H, W, L, P, Z> {
    pub sensor: S,
    pub display: D,
    pub http: H,
    pub wifi: W,
    pub led: L,
    pub button: P,
    pub sleeper: Z,
}

/// Monitor on the tokio runtime.
pub type TokioMonitor = Monitor<TokioPlatform>;

/// A validated configuration, ready to start.
pub struct Monitor<R: Platform> {
    config: MonitorConfig,
    _platform: PhantomData<R>,
}

impl<R> Monitor<R>
where
    R: Platform,
{
    /// # Errors
    /// Returns [`MonitorError::Config`] if `config` fails validation.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            _platform: PhantomData,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Draw the display labels and spawn all activities.
    ///
    /// `link_events` carries the network stack's notifications to the
    /// connectivity supervisor. Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns [`MonitorError::Config`] if the averaging window cannot be built.
    pub fn start<S, D, H, W, L, P, Z>(
        self,
        devices: Devices<S, D, H, W, L, P, Z>,
        link_events: Receiver<LinkEvent>,
    ) -> Result<MonitorHandle>
    where
        S: SampleSource,
        D: CharacterDisplay,
        H: HttpClient,
        W: WifiLink,
        L: IndicatorLed,
        P: InputPin,
        Z: DeepSleep,
    {
        let config = self.config;
        let timing = &config.timing;
        let cancel_token = CancellationToken::new();

        let bus = <R::Lock<SensorBus> as SharedLock<SensorBus>>::new(SensorBus::new(
            devices.sensor,
            devices.display,
        ));
        if let Err(e) = bus.with(|bus| bus.draw_labels()) {
            crate::warn!("{}", MonitorError::Display(e));
        }

        let alarm = Arc::new(AlarmCell::new());
        let activity = Arc::new(ActivityFlag::new());
        let gate = Arc::new(ConnectivityGate::new());
        let guard: RequestGuard = Arc::new(Mutex::new(()));

        let (raw_tx, raw_rx) = async_channel::bounded(config.channels.raw_capacity);
        let (vitals_tx, vitals_rx) = async_channel::bounded(config.channels.vitals_capacity);
        let (button, button_rx) = button_channel();

        let acquisition = Acquisition::new(
            R::Clock::default(),
            bus.clone(),
            raw_tx,
            timing.acquisition_period(),
            timing.raw_send_timeout(),
            cancel_token.clone(),
        );

        let aggregator = Aggregator::new(
            R::Clock::default(),
            bus,
            raw_rx,
            vitals_tx,
            VitalsWindow::new(config.window.size)?,
            config.thresholds,
            alarm.clone(),
            AggregatorTiming {
                receive_timeout: timing.aggregate_receive_timeout(),
                send_timeout: timing.vitals_send_timeout(),
            },
            cancel_token.clone(),
        );

        let uplink = Uplink::new(
            R::Clock::default(),
            devices.http,
            vitals_rx,
            gate.clone(),
            guard,
            config.uplink.clone(),
            timing.uplink_pace(),
            cancel_token.clone(),
        );

        let indicator = AlarmIndicator::new(
            R::Clock::default(),
            devices.led,
            alarm.clone(),
            timing.emergency_blink(),
            timing.normal_blink(),
            cancel_token.clone(),
        );

        let input = InputWatcher::new(
            R::Clock::default(),
            devices.button,
            config.pins.button,
            button_rx,
            alarm.clone(),
            activity.clone(),
            timing.button_poll_timeout(),
            cancel_token.clone(),
        );

        let supervisor = ConnectivitySupervisor::new(
            devices.wifi,
            link_events,
            gate.clone(),
            cancel_token.clone(),
        );

        let power = PowerManager::new(
            R::Clock::default(),
            devices.sleeper,
            config.pins.button,
            activity.clone(),
            gate.clone(),
            PowerTiming {
                tick: timing.power_tick(),
                idle_timeout: timing.idle_timeout(),
                link_wait: timing.link_wait(),
            },
            cancel_token.clone(),
        );

        let tasks = vec![
            ("connectivity", tokio::spawn(supervisor.run())),
            ("acquisition", tokio::spawn(acquisition.run())),
            ("aggregator", tokio::spawn(aggregator.run())),
            ("uplink", tokio::spawn(uplink.run())),
            ("indicator", tokio::spawn(indicator.run())),
            ("input", tokio::spawn(input.run())),
            (POWER_TASK, tokio::spawn(power.run())),
        ];
        crate::info!("Monitor started with {} activities", tasks.len());

        Ok(MonitorHandle {
            cancel_token,
            tasks,
            alarm,
            activity,
            gate,
            button,
        })
    }
}

const POWER_TASK: &str = "power";

/// A fatal error replaces a non-fatal one; otherwise the earlier one stays.
fn worse(held: Option<MonitorError>, next: MonitorError) -> MonitorError {
    match held {
        Some(held) if held.is_fatal() || !next.is_fatal() => held,
        _ => next,
    }
}

/// Running monitor.
///
/// The handle keeps the interrupt side of the button channel alive, so the
/// input watcher never sees its channel close while the handle exists.
pub struct MonitorHandle {
    cancel_token: CancellationToken,
    tasks: Vec<(&'static str, JoinHandle<Result<()>>)>,
    alarm: Arc<AlarmCell>,
    activity: Arc<ActivityFlag>,
    gate: Arc<ConnectivityGate>,
    button: ButtonInterrupt,
}

impl MonitorHandle {
    /// Handle to give to the button's falling-edge interrupt.
    pub fn button_interrupt(&self) -> ButtonInterrupt {
        self.button.clone()
    }

    /// Token that stops every activity when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn alarm(&self) -> &Arc<AlarmCell> {
        &self.alarm
    }

    pub fn activity(&self) -> &Arc<ActivityFlag> {
        &self.activity
    }

    pub fn gate(&self) -> &Arc<ConnectivityGate> {
        &self.gate
    }

    /// Wait for every activity to finish.
    ///
    /// The first activity to fail cancels the others. Once the rest have
    /// stopped, the first fatal error is returned; without one, the first
    /// error of any kind. A sensor failure is thus reported as such even when
    /// a downstream activity noticed its closed channel earlier.
    ///
    /// # Errors
    /// The error chosen as above, or [`MonitorError::InvalidState`] if an
    /// activity panicked.
    pub async fn join(mut self) -> Result<()> {
        let mut first_error = None;

        while !self.tasks.is_empty() {
            let (outcome, index) = {
                let (outcome, index, _) =
                    select_all(self.tasks.iter_mut().map(|(_, handle)| handle)).await;
                (outcome, index)
            };
            let (name, _) = self.tasks.swap_remove(index);

            let result = match outcome {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Ok(()),
                Err(e) => Err(MonitorError::invalid_state(format!(
                    "{name} activity panicked: {e}"
                ))),
            };

            match result {
                Ok(()) => crate::debug!("Activity {} finished", name),
                Err(e) => {
                    if e.is_fatal() {
                        crate::error!("Activity {} failed: {}", name, e);
                    } else {
                        crate::warn!("Activity {} stopped: {}", name, e);
                    }
                    self.cancel_token.cancel();
                    first_error = Some(worse(first_error, e));
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Stop every activity and wait for them.
    ///
    /// A power manager that has already entered deep sleep never observes
    /// cancellation, so its task is aborted.
    ///
    /// # Errors
    /// See [`MonitorHandle::join`].
    pub async fn shutdown(self) -> Result<()> {
        crate::info!("Monitor shutting down");
        self.cancel_token.cancel();
        if let Some((_, handle)) = self.tasks.iter().find(|(name, _)| *name == POWER_TASK) {
            handle.abort();
        }
        self.join().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsewatch_core::DeviceError;
    use std::time::Duration;

    fn handle(tasks: Vec<(&'static str, JoinHandle<Result<()>>)>) -> MonitorHandle {
        let (button, _button_rx) = button_channel();
        MonitorHandle {
            cancel_token: CancellationToken::new(),
            tasks,
            alarm: Arc::new(AlarmCell::new()),
            activity: Arc::new(ActivityFlag::new()),
            gate: Arc::new(ConnectivityGate::new()),
            button,
        }
    }

    #[test]
    fn worse_prefers_fatal_over_earlier_non_fatal() {
        let closed = MonitorError::channel_closed("raw samples");
        let sensor = MonitorError::Sensor(DeviceError::new("sensor", "bus stuck"));

        assert!(matches!(
            worse(Some(closed), sensor),
            MonitorError::Sensor(_)
        ));
        assert!(matches!(
            worse(None, MonitorError::channel_closed("vitals")),
            MonitorError::ChannelClosed { .. }
        ));
    }

    #[tokio::test]
    async fn join_reports_fatal_error_that_arrives_second() -> anyhow::Result<()> {
        // Arrange
        tokio::time::pause();
        let downstream = tokio::spawn(async { Err(MonitorError::channel_closed("raw samples")) });
        let upstream = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(MonitorError::Sensor(DeviceError::new("sensor", "bus stuck")))
        });
        let handle = handle(vec![("aggregator", downstream), ("acquisition", upstream)]);

        // Act
        let result = handle.join().await;

        // Assert
        assert!(matches!(result, Err(MonitorError::Sensor(_))));
        Ok(())
    }

    #[tokio::test]
    async fn join_keeps_first_error_when_none_is_fatal() -> anyhow::Result<()> {
        tokio::time::pause();
        let first = tokio::spawn(async { Err(MonitorError::channel_closed("vitals")) });
        let second = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(MonitorError::channel_closed("raw samples"))
        });

        let result = handle(vec![("uplink", first), ("aggregator", second)]).join().await;

        assert!(matches!(
            result,
            Err(MonitorError::ChannelClosed { ref channel }) if channel == "vitals"
        ));
        Ok(())
    }
}
