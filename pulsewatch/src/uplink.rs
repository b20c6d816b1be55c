// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Dashboard uplink.

use crate::config::UplinkConfig;
use crate::devices::HttpClient;
use async_channel::Receiver;
use core::time::Duration;
use futures::lock::Mutex;
use pulsewatch_core::{CancellationToken, ConnectivityGate, MonitorError, Result, Vitals};
use pulsewatch_runtime::Clock;
use std::sync::Arc;
use tokio::select;

/// Serializes outbound requests across every request issuer.
pub type RequestGuard = Arc<Mutex<()>>;

/// Build the batch-update request for one set of vitals.
///
/// ```
/// use pulsewatch::config::UplinkConfig;
/// use pulsewatch::uplink::request_url;
/// use pulsewatch_core::Vitals;
///
/// let config = UplinkConfig {
///     server_base: "http://h".to_string(),
///     device_token: "T".to_string(),
///     ..UplinkConfig::default()
/// };
///
/// assert_eq!(
///     request_url(&config, &Vitals::new(72.34, 95.67)),
///     "http://h/external/api/batch/update?token=T&V4=95.67&V3=72.34"
/// );
/// ```
pub fn request_url(config: &UplinkConfig, vitals: &Vitals) -> String {
    format!(
        "{}/external/api/batch/update?token={}&{}={:.2}&{}={:.2}",
        config.server_base.trim_end_matches('/'),
        config.device_token,
        config.spo2_field,
        vitals.mean_oxygen_saturation,
        config.heart_rate_field,
        vitals.mean_heart_rate,
    )
}

/// Forwards vitals to the dashboard while the network is associated.
///
/// Each cycle waits for the connectivity gate, then for the next vitals with
/// no timeout. Transport failures are logged and the vitals are discarded;
/// there is no retry.
pub struct Uplink<C, H> {
    clock: C,
    http: H,
    rx: Receiver<Vitals>,
    gate: Arc<ConnectivityGate>,
    guard: RequestGuard,
    config: UplinkConfig,
    pace: Duration,
    cancel_token: CancellationToken,
}

impl<C, H> Uplink<C, H>
where
    C: Clock,
    H: HttpClient,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: C,
        http: H,
        rx: Receiver<Vitals>,
        gate: Arc<ConnectivityGate>,
        guard: RequestGuard,
        config: UplinkConfig,
        pace: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            clock,
            http,
            rx,
            gate,
            guard,
            config,
            pace,
            cancel_token,
        }
    }

    pub async fn run(self) -> Result<()> {
        crate::info!("Uplink started");
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

        crate::info!("Uplink stopped");
        Ok(())
    }

    async fn cycle(&self) -> Result<()> {
        self.gate.wait().await;

        let vitals = self
            .rx
            .recv()
            .await
            .map_err(|_| MonitorError::channel_closed("vitals"))?;

        self.send(&vitals).await;
        self.clock.sleep(self.pace).await;
        Ok(())
    }

    async fn send(&self, vitals: &Vitals) {
        let _request = self.guard.lock().await;
        let url = request_url(&self.config, vitals);
        crate::debug!("Request: {}", url);

        match self.http.get(&url).await {
            Ok(status) => crate::info!("Dashboard responded with status {}", status),
            Err(e) => crate::warn!("{}", MonitorError::http(url, e)),
        }
    }
}
