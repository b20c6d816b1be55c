// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::devices::{LinkEvent, WifiLink};
use async_channel::Receiver;
use pulsewatch_core::{CancellationToken, ConnectivityGate, MonitorError, Result};
use std::sync::Arc;
use tokio::select;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Idle,
    Connecting,
    Connected,
}

/// Owns the association state and the [`ConnectivityGate`].
///
/// | event        | action                            | next state   |
/// |--------------|-----------------------------------|--------------|
/// | `Started`    | request association               | `Connecting` |
/// | `Associated` | set the gate                      | `Connected`  |
/// | `GotIp`      | log                               | unchanged    |
/// | `Lost`       | clear the gate, request again     | `Connecting` |
///
/// A rejected association request is logged and the state stays
/// `Connecting`; the next `Started` or `Lost` retries.
pub struct ConnectivitySupervisor<W> {
    link: W,
    events: Receiver<LinkEvent>,
    gate: Arc<ConnectivityGate>,
    state: LinkState,
    cancel_token: CancellationToken,
}

impl<W: WifiLink> ConnectivitySupervisor<W> {
    pub fn new(
        link: W,
        events: Receiver<LinkEvent>,
        gate: Arc<ConnectivityGate>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            link,
            events,
            gate,
            state: LinkState::Idle,
            cancel_token,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub async fn run(mut self) -> Result<()> {
        crate::info!("Connectivity supervisor started");
        let cancel_token = self.cancel_token.clone();

        loop {
            select! {
                _ = cancel_token.cancelled() => {
                    break;
                }
                event = self.events.recv() => {
                    let event = event.map_err(|_| MonitorError::channel_closed("link events"))?;
                    self.handle(event).await;
                }
            }
        }

        self.gate.clear();
        crate::info!("Connectivity supervisor stopped");
        Ok(())
    }

    /// Apply one link notification and return the resulting state.
    pub async fn handle(&mut self, event: LinkEvent) -> LinkState {
        match event {
            LinkEvent::Started => {
                crate::info!("Wi-Fi started, associating");
                self.associate().await;
            }
            LinkEvent::Associated => {
                crate::info!("Wi-Fi associated");
                self.state = LinkState::Connected;
                self.gate.set();
            }
            LinkEvent::GotIp => {
                crate::info!("Wi-Fi got IP");
            }
            LinkEvent::Lost => {
                crate::warn!("Wi-Fi lost, reconnecting");
                self.gate.clear();
                self.associate().await;
            }
        }
        self.state
    }

    async fn associate(&mut self) {
        self.state = LinkState::Connecting;
        if let Err(e) = self.link.associate().await {
            crate::warn!("{}", MonitorError::Link(e));
        }
    }
}
